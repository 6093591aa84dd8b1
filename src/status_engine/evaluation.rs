use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::global_variables::{
    DEFAULT_ETA_HORIZON_MINUTES, MAX_REQUIRED_SPEED_KMH, STATIONARY_SPEED_FLOOR_KMH,
    STOPPED_HOURS_TO_DESTINATION,
};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::status_engine::geometry::distance;
use crate::status_engine::stationarity::is_stationary;

const MILLIS_PER_MINUTE: f64 = 60_000.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Derived delivery health of one vehicle at one instant.
///
/// Recomputed on every call; never stored or reused across ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCalculation {
    pub vehicle_id: String,
    /// km, straight line to the destination.
    pub remaining_distance: f64,
    /// Minutes left before the scheduled ETA; negative once late.
    #[serde(rename = "timeUntilScheduledETA")]
    pub time_until_scheduled_eta: f64,
    /// km/h, capped at `MAX_REQUIRED_SPEED_KMH`.
    pub required_average_speed: f64,
    pub current_speed: f64,
    /// Hours to arrival at current speed, `STOPPED_HOURS_TO_DESTINATION` when stopped.
    pub hours_to_destination: f64,
    pub status: VehicleStatus,
    #[serde(rename = "projectedETA")]
    pub projected_eta: DateTime<Utc>,
    /// Projected minus scheduled arrival, minutes. Positive means late.
    pub eta_difference_minutes: f64,
}

/// Classifies a vehicle and projects its arrival, as of `now`.
///
/// Total over its numeric domain: every division is guarded and every
/// optional input is defaulted. Coordinates are assumed validated upstream;
/// NaN coordinates yield NaN distance and timing figures rather than an error.
/// Projected instants beyond the calendar range saturate at the maximum.
pub fn evaluate(vehicle: &Vehicle, now: DateTime<Utc>) -> StatusCalculation {
    let remaining_distance = distance(vehicle.position, vehicle.destination.position());

    let scheduled_eta = vehicle.scheduled_eta.unwrap_or_else(|| {
        now.checked_add_signed(TimeDelta::minutes(DEFAULT_ETA_HORIZON_MINUTES))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    });

    let millis_until_scheduled = (scheduled_eta - now).num_milliseconds() as f64;
    let time_until_scheduled_eta = millis_until_scheduled / MILLIS_PER_MINUTE;
    let hours_until_scheduled = millis_until_scheduled / MILLIS_PER_HOUR;

    let required_average_speed = if hours_until_scheduled > 0.0 {
        (remaining_distance / hours_until_scheduled).min(MAX_REQUIRED_SPEED_KMH)
    } else {
        MAX_REQUIRED_SPEED_KMH
    };

    let hours_to_destination = if vehicle.current_speed > 0.0 {
        remaining_distance / vehicle.current_speed
    } else {
        STOPPED_HOURS_TO_DESTINATION
    };

    let projected_eta = offset_by_hours(now, hours_to_destination);
    let eta_difference_minutes =
        (projected_eta - scheduled_eta).num_milliseconds() as f64 / MILLIS_PER_MINUTE;

    let status = if is_stationary(vehicle, now) {
        VehicleStatus::Critical
    } else if vehicle.current_speed >= required_average_speed {
        VehicleStatus::OnTime
    } else if vehicle.current_speed >= STATIONARY_SPEED_FLOOR_KMH {
        VehicleStatus::Warning
    } else {
        VehicleStatus::Critical
    };

    StatusCalculation {
        vehicle_id: vehicle.id.clone(),
        remaining_distance,
        time_until_scheduled_eta,
        required_average_speed,
        current_speed: vehicle.current_speed,
        hours_to_destination,
        status,
        projected_eta,
        eta_difference_minutes,
    }
}

// `as` saturates at the i64 range and maps NaN to zero, so a NaN offset
// projects to `now`.
fn offset_by_hours(now: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    TimeDelta::try_milliseconds((hours * MILLIS_PER_HOUR) as i64)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::position::{Destination, Position};
    use chrono::TimeZone;

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    fn vehicle(speed: f64, scheduled_eta: Option<DateTime<Utc>>) -> Vehicle {
        Vehicle::new(
            "VH-7",
            "Ravi",
            Position::new(12.9716, 77.5946),
            Destination::new(Position::new(12.9352, 77.6245), "Koramangala"),
            speed,
            scheduled_eta,
        )
    }

    #[test]
    fn projected_eta_follows_current_speed() {
        let now = frozen_now();
        let v = vehicle(30.0, Some(now + TimeDelta::minutes(30)));
        let calc = evaluate(&v, now);

        let expected_hours = calc.remaining_distance / 30.0;
        assert!((calc.hours_to_destination - expected_hours).abs() < 1e-12);
        let projected_minutes = (calc.projected_eta - now).num_milliseconds() as f64 / 60_000.0;
        assert!((projected_minutes - expected_hours * 60.0).abs() < 0.001);
        assert!((calc.eta_difference_minutes - (projected_minutes - 30.0)).abs() < 0.001);
        assert_eq!(calc.status, VehicleStatus::OnTime);
    }

    #[test]
    fn late_deadline_demands_maximum_speed() {
        let now = frozen_now();
        let v = vehicle(40.0, Some(now - TimeDelta::minutes(5)));
        let calc = evaluate(&v, now);
        assert_eq!(calc.required_average_speed, MAX_REQUIRED_SPEED_KMH);
        assert!((calc.time_until_scheduled_eta + 5.0).abs() < 1e-12);
        assert_eq!(calc.status, VehicleStatus::Warning);
    }

    #[test]
    fn deadline_exactly_now_demands_maximum_speed() {
        let now = frozen_now();
        let calc = evaluate(&vehicle(40.0, Some(now)), now);
        assert_eq!(calc.required_average_speed, MAX_REQUIRED_SPEED_KMH);
        assert_eq!(calc.time_until_scheduled_eta, 0.0);
    }

    #[test]
    fn slow_but_moving_is_critical() {
        let now = frozen_now();
        let calc = evaluate(&vehicle(7.99, Some(now + TimeDelta::minutes(5))), now);
        assert_eq!(calc.status, VehicleStatus::Critical);
    }

    #[test]
    fn slow_vehicle_is_on_time_when_it_is_already_fast_enough() {
        let now = frozen_now();
        // ~5 km in 24 hours needs well under 1 km/h.
        let calc = evaluate(&vehicle(2.0, Some(now + TimeDelta::hours(24))), now);
        assert!(calc.required_average_speed < 2.0);
        assert_eq!(calc.status, VehicleStatus::OnTime);
    }

    #[test]
    fn already_at_destination() {
        let now = frozen_now();
        let mut v = vehicle(0.0, None);
        v.position = v.destination.position();
        let calc = evaluate(&v, now);
        assert_eq!(calc.remaining_distance, 0.0);
        assert_eq!(calc.required_average_speed, 0.0);
        // Stopped on the spot still meets a zero requirement.
        assert_eq!(calc.status, VehicleStatus::OnTime);
    }

    #[test]
    fn tiny_speed_saturates_instead_of_overflowing() {
        let now = frozen_now();
        let calc = evaluate(&vehicle(1e-300, None), now);
        assert_eq!(calc.projected_eta, DateTime::<Utc>::MAX_UTC);
        assert_eq!(calc.status, VehicleStatus::Critical);
    }

    #[test]
    fn default_eta_saturates_at_calendar_maximum() {
        let now = DateTime::<Utc>::MAX_UTC;
        let calc = evaluate(&vehicle(30.0, None), now);
        assert_eq!(calc.time_until_scheduled_eta, 0.0);
        assert_eq!(calc.required_average_speed, MAX_REQUIRED_SPEED_KMH);
        assert_eq!(calc.projected_eta, DateTime::<Utc>::MAX_UTC);
        assert_eq!(calc.status, VehicleStatus::Warning);
    }

    #[test]
    fn nan_position_does_not_panic() {
        let now = frozen_now();
        let mut v = vehicle(20.0, None);
        v.position = Position::new(f64::NAN, 77.0);
        let calc = evaluate(&v, now);
        assert!(calc.remaining_distance.is_nan());
        assert!(calc.hours_to_destination.is_nan());
        assert_eq!(calc.projected_eta, now);
    }

    #[test]
    fn serializes_with_dashboard_field_names() {
        let now = frozen_now();
        let value = serde_json::to_value(evaluate(&vehicle(30.0, None), now)).unwrap();
        for key in [
            "vehicleId",
            "remainingDistance",
            "timeUntilScheduledETA",
            "requiredAverageSpeed",
            "currentSpeed",
            "status",
            "projectedETA",
            "etaDifferenceMinutes",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
