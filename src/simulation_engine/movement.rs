use chrono::{DateTime, Utc};

use crate::global_variables::MAX_HISTORY_ENTRIES;
use crate::models::position::Position;
use crate::models::vehicle::{StatusHistoryEntry, Vehicle};
use crate::simulation_engine::route_progress::RouteTracker;
use crate::status_engine::evaluation::{evaluate, StatusCalculation};
use crate::status_engine::geometry::{advance, distance, initial_bearing};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Moves a vehicle by one tick and records the outcome.
///
/// # Behavior
///
/// - With a tracked road route the vehicle follows the polyline.
/// - Without one it heads straight for its destination and never overshoots it.
/// - The heading is updated whenever the vehicle actually moved.
/// - The status is re-evaluated at the new position, stored on the vehicle
///   and appended to its history, which is trimmed to `MAX_HISTORY_ENTRIES`.
pub fn advance_vehicle(
    vehicle: &mut Vehicle,
    tracker: &mut RouteTracker,
    interval_secs: f64,
    now: DateTime<Utc>,
) -> StatusCalculation {
    let previous = vehicle.position;
    let next = match tracker.next_road_position(vehicle, interval_secs, now) {
        Some(position) => position,
        None => direct_step(vehicle, interval_secs),
    };

    if distance(previous, next) > 0.0 {
        vehicle.heading = Some(initial_bearing(previous, next));
    }
    vehicle.position = next;

    let calculation = evaluate(vehicle, now);
    vehicle.status = calculation.status;
    vehicle.status_history.push(StatusHistoryEntry {
        timestamp: now,
        status: calculation.status,
        speed: vehicle.current_speed,
        position: next,
    });
    trim_history(&mut vehicle.status_history, MAX_HISTORY_ENTRIES);

    calculation
}

/// Straight-line step toward the destination, capped at the remaining distance.
fn direct_step(vehicle: &Vehicle, interval_secs: f64) -> Position {
    let target = vehicle.destination.position();
    let remaining = distance(vehicle.position, target);
    let step = vehicle.current_speed * interval_secs / SECONDS_PER_HOUR;

    if step <= 0.0 {
        return vehicle.position;
    }
    if step >= remaining {
        return target;
    }
    advance(vehicle.position, step, initial_bearing(vehicle.position, target))
}

fn trim_history(history: &mut Vec<StatusHistoryEntry>, capacity: usize) {
    if history.len() > capacity {
        let excess = history.len() - capacity;
        history.drain(..excess);
    }
}
