use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::monitoring::fleet_summary::StatusCounters;
use crate::status_engine::evaluation::{evaluate, StatusCalculation};

/// One row of the fleet report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReportRecord {
    pub generated_at: DateTime<Utc>,
    pub vehicle_id: String,
    pub driver_name: String,
    pub status: VehicleStatus,
    pub current_speed_kmh: f64,
    pub remaining_distance_km: f64,
    pub required_speed_kmh: f64,
    /// Empty when the vehicle has no schedule of its own.
    pub scheduled_eta: Option<DateTime<Utc>>,
    pub projected_eta: DateTime<Utc>,
    pub eta_difference_minutes: f64,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FleetReport {
    pub generated_at: DateTime<Utc>,
    pub counters: StatusCounters,
    /// Critical vehicles first.
    pub records: Vec<FleetReportRecord>,
}

/// Evaluates every vehicle at `now` and assembles the report.
///
/// Counters and ordering use the freshly computed status, not the one
/// stored on the vehicle, so the report is consistent with its own rows.
pub fn build_fleet_report(vehicles: &[Vehicle], now: DateTime<Utc>) -> FleetReport {
    let calculations: Vec<StatusCalculation> =
        vehicles.iter().map(|vehicle| evaluate(vehicle, now)).collect();
    assemble_fleet_report(vehicles, &calculations, now)
}

/// Builds the report from calculations already made at `now`, one per
/// vehicle and in the same order.
pub fn assemble_fleet_report(
    vehicles: &[Vehicle],
    calculations: &[StatusCalculation],
    now: DateTime<Utc>,
) -> FleetReport {
    let mut records: Vec<FleetReportRecord> = vehicles
        .iter()
        .zip(calculations)
        .map(|(vehicle, calc)| FleetReportRecord {
            generated_at: now,
            vehicle_id: calc.vehicle_id.clone(),
            driver_name: vehicle.driver_name.clone(),
            status: calc.status,
            current_speed_kmh: calc.current_speed,
            remaining_distance_km: calc.remaining_distance,
            required_speed_kmh: calc.required_average_speed,
            scheduled_eta: vehicle.scheduled_eta,
            projected_eta: calc.projected_eta,
            eta_difference_minutes: calc.eta_difference_minutes,
            destination: vehicle.destination.address.clone(),
        })
        .collect();
    records.sort_by_key(|r| r.status.severity_rank());

    FleetReport {
        generated_at: now,
        counters: StatusCounters::from_calculations(&calculations[..records.len()]),
        records,
    }
}

/// Writes the report rows, with a header, to any writer.
pub fn write_report_csv<W: Write>(
    report: &FleetReport,
    writer: W,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in &report.records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_report_csv<R: Read>(reader: R) -> Result<Vec<FleetReportRecord>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: FleetReportRecord = result?;
        records.push(record);
    }
    Ok(records)
}

/// Appends the report to a CSV file, writing the header only when the file is new.
pub fn log_report_to_csv<P: AsRef<Path>>(
    path: P,
    report: &FleetReport,
) -> Result<(), Box<dyn Error>> {
    let file_exists = path.as_ref().exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    for record in &report.records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn count_report_records<P: AsRef<Path>>(path: P) -> Result<usize, Box<dyn Error>> {
    let file = File::open(path)?;
    Ok(read_report_csv(file)?.len())
}
