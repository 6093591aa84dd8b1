use chrono::{DateTime, TimeDelta, Utc};

use crate::global_variables::{
    STATIONARY_MIN_SAMPLES, STATIONARY_SPEED_FLOOR_KMH, STATIONARY_WINDOW_MINUTES,
};
use crate::models::vehicle::Vehicle;

/// Whether the vehicle has been crawling (below 8 km/h) for the whole
/// trailing 10-minute window, with at least 5 samples to back that up.
///
/// A single slow sample (a red light) never trips this; neither does a
/// vehicle that has only just started reporting.
///
/// History is read newest-first and the scan stops at the first entry older
/// than the window, so cost is bounded by the window and not by the total
/// history length.
pub fn is_stationary(vehicle: &Vehicle, now: DateTime<Utc>) -> bool {
    if vehicle.status_history.is_empty() {
        return false;
    }

    let window_start = now
        .checked_sub_signed(TimeDelta::minutes(STATIONARY_WINDOW_MINUTES))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut samples = 0usize;

    for entry in vehicle.status_history.iter().rev() {
        if entry.timestamp < window_start {
            break;
        }
        if entry.speed.is_nan() || entry.speed >= STATIONARY_SPEED_FLOOR_KMH {
            return false;
        }
        samples += 1;
    }

    samples >= STATIONARY_MIN_SAMPLES
}
