use serde::{Deserialize, Serialize};

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::status_engine::evaluation::StatusCalculation;

/// Per-status vehicle counts shown in the dashboard header and report summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounters {
    pub total: usize,
    pub on_time: usize,
    pub warning: usize,
    pub critical: usize,
}

impl StatusCounters {
    pub fn tally<I: IntoIterator<Item = VehicleStatus>>(statuses: I) -> Self {
        let mut counters = Self::default();
        for status in statuses {
            counters.record(status);
        }
        counters
    }

    /// Counts the status each vehicle last recorded.
    pub fn from_vehicles(vehicles: &[Vehicle]) -> Self {
        Self::tally(vehicles.iter().map(|v| v.status))
    }

    pub fn from_calculations(calculations: &[StatusCalculation]) -> Self {
        Self::tally(calculations.iter().map(|c| c.status))
    }

    pub fn record(&mut self, status: VehicleStatus) {
        self.total += 1;
        match status {
            VehicleStatus::OnTime => self.on_time += 1,
            VehicleStatus::Warning => self.warning += 1,
            VehicleStatus::Critical => self.critical += 1,
        }
    }
}

/// Critical vehicles first, then warning, then on-time. Stable within a status.
pub fn sort_by_severity(vehicles: &mut [Vehicle]) {
    vehicles.sort_by_key(|v| v.status.severity_rank());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::position::{Destination, Position};

    fn vehicle(id: &str, status: VehicleStatus) -> Vehicle {
        let mut v = Vehicle::new(
            id,
            "Driver",
            Position::new(0.0, 0.0),
            Destination::new(Position::new(0.0, 0.1), "Somewhere"),
            20.0,
            None,
        );
        v.status = status;
        v
    }

    #[test]
    fn counts_add_up() {
        let fleet = vec![
            vehicle("a", VehicleStatus::OnTime),
            vehicle("b", VehicleStatus::Critical),
            vehicle("c", VehicleStatus::Warning),
            vehicle("d", VehicleStatus::OnTime),
        ];
        let counters = StatusCounters::from_vehicles(&fleet);
        assert_eq!(
            counters,
            StatusCounters {
                total: 4,
                on_time: 2,
                warning: 1,
                critical: 1
            }
        );
        assert_eq!(counters.on_time + counters.warning + counters.critical, counters.total);
    }

    #[test]
    fn empty_fleet_is_all_zero() {
        assert_eq!(StatusCounters::from_vehicles(&[]), StatusCounters::default());
    }

    #[test]
    fn severity_sort_is_stable() {
        let mut fleet = vec![
            vehicle("a", VehicleStatus::OnTime),
            vehicle("b", VehicleStatus::Warning),
            vehicle("c", VehicleStatus::Critical),
            vehicle("d", VehicleStatus::Warning),
            vehicle("e", VehicleStatus::Critical),
        ];
        sort_by_severity(&mut fleet);
        let order: Vec<_> = fleet.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(order, ["c", "e", "b", "d", "a"]);
    }
}
