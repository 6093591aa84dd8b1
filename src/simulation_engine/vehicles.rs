use chrono::{DateTime, TimeDelta, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::position::{Destination, Position};
use crate::models::vehicle::Vehicle;
use crate::status_engine::geometry::{advance, distance};

const DRIVER_NAMES: [&str; 8] = [
    "Asha", "Ravi", "Meera", "Kiran", "Arjun", "Divya", "Sanjay", "Lakshmi",
];

/// Kinds of delivery vehicle the simulator spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    Motorcycle,
    Van,
    Truck,
}

impl VehicleClass {
    /// Initial cruising speed range in km/h.
    pub fn cruise_speed_range(self) -> (f64, f64) {
        match self {
            VehicleClass::Motorcycle => (25.0, 50.0),
            VehicleClass::Van => (20.0, 45.0),
            VehicleClass::Truck => (15.0, 35.0),
        }
    }

    /// Speed dispatch plans with when setting the scheduled ETA.
    pub fn planning_speed(self) -> f64 {
        match self {
            VehicleClass::Motorcycle => 30.0,
            VehicleClass::Van => 25.0,
            VehicleClass::Truck => 20.0,
        }
    }

    fn random<R: Rng>(rng: &mut R) -> Self {
        let roll: f64 = rng.random_range(0.0..1.0);
        if roll < 0.40 {
            VehicleClass::Motorcycle
        } else if roll < 0.85 {
            VehicleClass::Van
        } else {
            VehicleClass::Truck
        }
    }
}

/// Spawns a vehicle at a random point near `depot` with a random drop-off
/// 2–15 km away and a scheduled ETA planned at the class's planning speed.
pub fn spawn_vehicle<R: Rng>(
    id: u64,
    depot: Position,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vehicle {
    let class = VehicleClass::random(rng);
    let (min_speed, max_speed) = class.cruise_speed_range();

    let start = advance(depot, rng.random_range(0.0..3.0), rng.random_range(0.0..360.0));
    let destination = random_destination(start, id, rng);
    let driver = DRIVER_NAMES.choose(rng).copied().unwrap_or("Driver");

    let mut vehicle = Vehicle::new(
        format!("VH-{:03}", id),
        driver,
        start,
        destination,
        rng.random_range(min_speed..max_speed),
        None,
    );
    vehicle.scheduled_eta = Some(plan_eta(&vehicle, class, now));
    vehicle
}

/// Spawns `size` vehicles with ids starting at 1.
pub fn generate_fleet<R: Rng>(
    size: usize,
    depot: Position,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Vehicle> {
    (1..=size as u64)
        .map(|id| spawn_vehicle(id, depot, now, rng))
        .collect()
}

/// Gives a vehicle that has arrived a fresh drop-off and schedule.
pub fn redispatch<R: Rng>(vehicle: &mut Vehicle, job: u64, now: DateTime<Utc>, rng: &mut R) {
    let class = VehicleClass::random(rng);
    vehicle.destination = random_destination(vehicle.position, job, rng);
    vehicle.scheduled_eta = Some(plan_eta(vehicle, class, now));
    log::info!(
        "Vehicle {} dispatched to {} (ETA {:?})",
        vehicle.id,
        vehicle.destination.address,
        vehicle.scheduled_eta
    );
}

fn random_destination<R: Rng>(from: Position, job: u64, rng: &mut R) -> Destination {
    let drop_off = advance(from, rng.random_range(2.0..15.0), rng.random_range(0.0..360.0));
    Destination::new(drop_off, format!("Drop-off #{}", job))
}

fn plan_eta(vehicle: &Vehicle, class: VehicleClass, now: DateTime<Utc>) -> DateTime<Utc> {
    let km = distance(vehicle.position, vehicle.destination.position());
    let minutes = (km / class.planning_speed() * 60.0).ceil() as i64;
    now + TimeDelta::minutes(minutes)
}
