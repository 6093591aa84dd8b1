pub mod position;
pub mod vehicle;

pub use position::{Destination, Position};
pub use vehicle::{load_fleet, StatusHistoryEntry, Vehicle, VehicleStatus};
