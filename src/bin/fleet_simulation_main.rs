// fleet_simulation_main.rs
use chrono::Utc;
use fleet_status::simulation_engine::simulation::{run_simulation, SimulationConfig};
use fleet_status::simulation_engine::vehicles::generate_fleet;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = SimulationConfig::from_env();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let fleet = generate_fleet(config.fleet_size, config.depot, Utc::now(), &mut rng);
    println!("Starting fleet simulation with {} vehicles...", fleet.len());

    run_simulation(config, Arc::new(Mutex::new(fleet))).await;
}
