// fleet_report_main.rs
use chrono::Utc;
use fleet_status::global_variables::FLEET_REPORT_FILE;
use fleet_status::models::vehicle::load_fleet;
use fleet_status::monitoring::fleet_report::{build_fleet_report, log_report_to_csv};
use std::error::Error;

fn run(fleet_path: &str, report_path: &str) -> Result<(), Box<dyn Error>> {
    let vehicles = load_fleet(fleet_path)?;
    let report = build_fleet_report(&vehicles, Utc::now());

    println!("Fleet Summary ({})", report.generated_at.to_rfc3339());
    println!("Total: {}", report.counters.total);
    println!("On-Time: {}", report.counters.on_time);
    println!("Warning: {}", report.counters.warning);
    println!("Critical: {}", report.counters.critical);
    for (index, record) in report.records.iter().enumerate() {
        println!(
            "{}. {} ({}) {} | {:.0} km/h | {:.1} km left | ETA diff {:+.0} min",
            index + 1,
            record.driver_name,
            record.vehicle_id,
            record.status.to_string().to_uppercase(),
            record.current_speed_kmh,
            record.remaining_distance_km,
            record.eta_difference_minutes
        );
    }

    log_report_to_csv(report_path, &report)?;
    log::info!("Appended {} rows to {}", report.records.len(), report_path);
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(fleet_path) = args.get(1) else {
        eprintln!("Usage: fleet_report_main <fleet.json> [report.csv]");
        std::process::exit(2);
    };
    let report_path = args.get(2).map(String::as_str).unwrap_or(FLEET_REPORT_FILE);

    if let Err(e) = run(fleet_path, report_path) {
        eprintln!("Report error: {}", e);
        std::process::exit(1);
    }
}
