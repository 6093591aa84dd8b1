// status_engine/mod.rs
pub mod clock;
pub mod evaluation;
pub mod geometry;
pub mod stationarity;

pub use clock::{Clock, FixedClock, SystemClock};
pub use evaluation::{evaluate, StatusCalculation};
pub use geometry::{advance, distance, initial_bearing};
pub use stationarity::is_stationary;

use crate::models::vehicle::Vehicle;

/// Status engine bound to a clock.
///
/// Holds no state besides the clock, so one engine can be shared freely
/// between the map refresh, dashboard polling and report export.
#[derive(Debug, Clone, Default)]
pub struct StatusEngine<C: Clock = SystemClock> {
    clock: C,
}

impl<C: Clock> StatusEngine<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn evaluate(&self, vehicle: &Vehicle) -> StatusCalculation {
        evaluate(vehicle, self.clock.now())
    }

    pub fn is_stationary(&self, vehicle: &Vehicle) -> bool {
        is_stationary(vehicle, self.clock.now())
    }

    /// Evaluates a whole fleet against a single instant.
    pub fn evaluate_fleet(&self, vehicles: &[Vehicle]) -> Vec<StatusCalculation> {
        let now = self.clock.now();
        vehicles.iter().map(|v| evaluate(v, now)).collect()
    }
}
