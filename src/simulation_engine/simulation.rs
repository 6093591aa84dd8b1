// simulation.rs
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::time::{interval, Duration};

use crate::global_variables::{FLEET_REPORT_FILE, MAX_SIMULATED_SPEED_KMH, TICK_INTERVAL_SECS};
use crate::models::position::Position;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::monitoring::fleet_report::{assemble_fleet_report, log_report_to_csv};
use crate::simulation_engine::movement::advance_vehicle;
use crate::simulation_engine::route_progress::RouteTracker;
use crate::simulation_engine::vehicles::redispatch;
use crate::status_engine::clock::{Clock, SystemClock};
use crate::status_engine::evaluation::StatusCalculation;
use crate::status_engine::geometry::distance;

/// Chance per tick that a moving vehicle stops dead (traffic, loading bay, breakdown).
const STALL_PROBABILITY: f64 = 0.01;
/// Chance per tick that a stopped vehicle pulls away again.
const RESTART_PROBABILITY: f64 = 0.05;
/// Largest speed change between two ticks, km/h.
const MAX_SPEED_DRIFT_KMH: f64 = 5.0;
/// A vehicle closer than this to its drop-off counts as arrived.
const ARRIVAL_RADIUS_KM: f64 = 0.05;

/// Runtime settings of the fleet simulation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub fleet_size: usize,
    pub tick_secs: u64,
    pub seed: u64,
    pub depot: Position,
    /// CSV file the fleet report is appended to; `None` disables it.
    pub report_file: Option<String>,
    pub report_every_ticks: u64,
    /// Stop after this many ticks; `None` runs forever.
    pub max_ticks: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fleet_size: 12,
            tick_secs: TICK_INTERVAL_SECS,
            seed: 1,
            // MG Road, Bangalore.
            depot: Position::new(12.9716, 77.5946),
            report_file: Some(FLEET_REPORT_FILE.to_string()),
            report_every_ticks: 15,
            max_ticks: None,
        }
    }
}

impl SimulationConfig {
    /// Defaults overridden by `FLEET_SIZE`, `FLEET_TICK_SECS`, `FLEET_SEED`,
    /// `FLEET_REPORT_FILE` and `FLEET_MAX_TICKS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let report_file = match std::env::var("FLEET_REPORT_FILE") {
            Ok(path) if path.is_empty() => None,
            Ok(path) => Some(path),
            Err(_) => defaults.report_file,
        };

        Self {
            fleet_size: parse_or(
                "FLEET_SIZE",
                std::env::var("FLEET_SIZE").ok(),
                defaults.fleet_size,
            ),
            tick_secs: parse_or(
                "FLEET_TICK_SECS",
                std::env::var("FLEET_TICK_SECS").ok(),
                defaults.tick_secs,
            )
            .max(1),
            seed: parse_or("FLEET_SEED", std::env::var("FLEET_SEED").ok(), defaults.seed),
            report_file,
            max_ticks: std::env::var("FLEET_MAX_TICKS").ok().and_then(|raw| {
                match raw.trim().parse() {
                    Ok(ticks) => Some(ticks),
                    Err(_) => {
                        log::warn!("Ignoring invalid FLEET_MAX_TICKS={:?}, running forever", raw);
                        None
                    }
                }
            }),
            ..defaults
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring invalid {}={:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}

/// Moves a fleet tick by tick. Owns the route progress and the random source,
/// so nothing about the simulation lives in globals.
pub struct FleetSimulator<R: Rng = StdRng> {
    tracker: RouteTracker,
    rng: R,
    interval_secs: f64,
    dispatched: u64,
}

impl FleetSimulator<StdRng> {
    pub fn seeded(seed: u64, interval_secs: f64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), interval_secs)
    }
}

impl<R: Rng> FleetSimulator<R> {
    pub fn new(rng: R, interval_secs: f64) -> Self {
        Self {
            tracker: RouteTracker::new(),
            rng,
            interval_secs,
            dispatched: 0,
        }
    }

    pub fn tracker(&self) -> &RouteTracker {
        &self.tracker
    }

    /// Road routes are handed in here by whoever fetched them.
    pub fn tracker_mut(&mut self) -> &mut RouteTracker {
        &mut self.tracker
    }

    /// Advances every vehicle by one tick and returns their fresh calculations.
    ///
    /// Arrived vehicles are re-dispatched first; every vehicle's speed then
    /// drifts randomly before it moves.
    pub fn step(
        &mut self,
        vehicles: &mut [Vehicle],
        now: DateTime<Utc>,
    ) -> Vec<StatusCalculation> {
        let fleet_size = vehicles.len() as u64;
        let mut calculations = Vec::with_capacity(vehicles.len());

        for vehicle in vehicles.iter_mut() {
            if distance(vehicle.position, vehicle.destination.position()) < ARRIVAL_RADIUS_KM {
                log::info!("Vehicle {} arrived at {}", vehicle.id, vehicle.destination.address);
                self.tracker.clear(&vehicle.id);
                self.dispatched += 1;
                redispatch(vehicle, fleet_size + self.dispatched, now, &mut self.rng);
            }

            drift_speed(vehicle, &mut self.rng);
            calculations.push(advance_vehicle(vehicle, &mut self.tracker, self.interval_secs, now));
        }

        calculations
    }
}

fn drift_speed<R: Rng>(vehicle: &mut Vehicle, rng: &mut R) {
    if vehicle.current_speed <= 0.0 {
        if rng.random_bool(RESTART_PROBABILITY) {
            vehicle.current_speed = rng.random_range(10.0..30.0);
            log::debug!("Vehicle {} moving again", vehicle.id);
        }
        return;
    }

    if rng.random_bool(STALL_PROBABILITY) {
        vehicle.current_speed = 0.0;
        log::debug!("Vehicle {} stopped", vehicle.id);
        return;
    }

    let drift = rng.random_range(-MAX_SPEED_DRIFT_KMH..MAX_SPEED_DRIFT_KMH);
    vehicle.current_speed = (vehicle.current_speed + drift).clamp(0.0, MAX_SIMULATED_SPEED_KMH);
}

/// Main simulation loop.
///
/// Every tick the fleet is stepped under the lock, an immutable snapshot is
/// cloned out, and the lock is released before the snapshot is reported, so
/// readers never see a half-updated vehicle. The report reuses the
/// calculations made by the step.
pub async fn run_simulation(config: SimulationConfig, fleet: Arc<Mutex<Vec<Vehicle>>>) {
    let clock = SystemClock;
    let mut simulator = FleetSimulator::seeded(config.seed, config.tick_secs as f64);
    let mut ticker = interval(Duration::from_secs(config.tick_secs.max(1)));
    let mut tick: u64 = 0;

    log::info!(
        "Fleet simulation started: tick every {}s, report {:?}",
        config.tick_secs,
        config.report_file
    );

    loop {
        ticker.tick().await;
        let now = clock.now();

        let (snapshot, calculations) = {
            let mut guard = fleet.lock().unwrap_or_else(PoisonError::into_inner);
            let calculations = simulator.step(&mut guard, now);
            (guard.clone(), calculations)
        };
        tick += 1;

        let report = assemble_fleet_report(&snapshot, &calculations, now);
        let counters = report.counters;
        log::info!(
            "Tick {}: {} vehicles, {} on-time, {} warning, {} critical",
            tick,
            counters.total,
            counters.on_time,
            counters.warning,
            counters.critical
        );
        for record in report
            .records
            .iter()
            .filter(|r| r.status == VehicleStatus::Critical)
        {
            match serde_json::to_string(record) {
                Ok(payload) => log::warn!("Critical vehicle: {}", payload),
                Err(e) => log::error!("Failed to serialize report record: {}", e),
            }
        }

        if let Some(path) = &config.report_file {
            if config.report_every_ticks > 0 && tick % config.report_every_ticks == 0 {
                if let Err(e) = log_report_to_csv(path, &report) {
                    log::error!("Error logging fleet report to {}: {}", path, e);
                }
            }
        }

        if config.max_ticks.is_some_and(|max| tick >= max) {
            log::info!("Fleet simulation stopped after {} ticks", tick);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_engine::vehicles::generate_fleet;
    use chrono::TimeDelta;

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or("X", Some("25".to_string()), 12usize), 25);
        assert_eq!(parse_or("X", Some(" 7 ".to_string()), 12usize), 7);
        assert_eq!(parse_or("X", Some("lots".to_string()), 12usize), 12);
        assert_eq!(parse_or::<u64>("X", None, 4), 4);
    }

    #[test]
    fn step_appends_one_history_entry_per_vehicle() {
        let now = Utc::now();
        let mut sim = FleetSimulator::seeded(5, 4.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut fleet = generate_fleet(4, Position::new(12.9716, 77.5946), now, &mut rng);

        for tick in 0..10 {
            let calcs = sim.step(&mut fleet, now + TimeDelta::seconds(tick * 4));
            assert_eq!(calcs.len(), 4);
        }
        for v in &fleet {
            assert_eq!(v.status_history.len(), 10);
            assert!(v.current_speed >= 0.0 && v.current_speed <= MAX_SIMULATED_SPEED_KMH);
        }
    }

    #[test]
    fn arrived_vehicle_is_redispatched() {
        let now = Utc::now();
        let mut sim = FleetSimulator::seeded(9, 4.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut fleet = generate_fleet(1, Position::new(12.9716, 77.5946), now, &mut rng);
        fleet[0].position = fleet[0].destination.position();

        sim.step(&mut fleet, now);

        assert_eq!(fleet[0].destination.address, "Drop-off #2");
        assert!(distance(fleet[0].position, fleet[0].destination.position()) > ARRIVAL_RADIUS_KM);
    }

    #[test]
    fn arrival_drops_the_assigned_road_route() {
        let now = Utc::now();
        let mut sim = FleetSimulator::seeded(3, 4.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut fleet = generate_fleet(1, Position::new(12.9716, 77.5946), now, &mut rng);
        let id = fleet[0].id.clone();
        let route = vec![fleet[0].position, fleet[0].destination.position()];

        assert!(sim.tracker_mut().assign_route(&id, route, now));
        assert!(sim.tracker().has_route(&id));

        fleet[0].position = fleet[0].destination.position();
        sim.step(&mut fleet, now);
        assert!(!sim.tracker().has_route(&id));
    }

    #[test]
    fn stopped_vehicle_never_drifts_negative() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut fleet = generate_fleet(1, Position::new(0.0, 0.0), Utc::now(), &mut rng);
        fleet[0].current_speed = 0.0;
        for _ in 0..200 {
            drift_speed(&mut fleet[0], &mut rng);
            assert!(fleet[0].current_speed >= 0.0);
        }
    }

    #[tokio::test]
    async fn single_tick_run_updates_shared_fleet() {
        let config = SimulationConfig {
            fleet_size: 3,
            report_file: None,
            max_ticks: Some(1),
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let started = SystemClock.now();
        let fleet = Arc::new(Mutex::new(generate_fleet(3, config.depot, started, &mut rng)));

        run_simulation(config, Arc::clone(&fleet)).await;

        let guard = fleet.lock().unwrap();
        assert!(guard.iter().all(|v| v.status_history.len() == 1));
        // The tick was stamped by the wall clock.
        let stamped = guard[0].status_history[0].timestamp;
        assert!(stamped >= started && stamped <= SystemClock.now());
    }
}
