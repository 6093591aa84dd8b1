use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::models::position::{Destination, Position};

/// Delivery health of a vehicle. Closed set: nothing else is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleStatus {
    #[default]
    OnTime,
    Warning,
    Critical,
}

impl VehicleStatus {
    /// Sort key for dashboards and reports: critical first, on-time last.
    pub fn severity_rank(self) -> u8 {
        match self {
            VehicleStatus::Critical => 0,
            VehicleStatus::Warning => 1,
            VehicleStatus::OnTime => 2,
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            VehicleStatus::OnTime => write!(f, "on-time"),
            VehicleStatus::Warning => write!(f, "warning"),
            VehicleStatus::Critical => write!(f, "critical"),
        }
    }
}

/// One sample appended by the tracking layer every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub status: VehicleStatus,
    /// km/h, never negative.
    pub speed: f64,
    pub position: Position,
}

/// Snapshot of a delivery vehicle as seen by the status engine.
///
/// `status_history` is ordered oldest first; timestamps never decrease but
/// gaps between entries are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    #[serde(default)]
    pub driver_name: String,
    pub position: Position,
    pub destination: Destination,
    /// km/h, never negative.
    pub current_speed: f64,
    /// Degrees clockwise from north.
    #[serde(default)]
    pub heading: Option<f64>,
    #[serde(default, rename = "scheduledETA")]
    pub scheduled_eta: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        driver_name: impl Into<String>,
        position: Position,
        destination: Destination,
        current_speed: f64,
        scheduled_eta: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            driver_name: driver_name.into(),
            position,
            destination,
            current_speed,
            heading: None,
            scheduled_eta,
            status: VehicleStatus::OnTime,
            status_history: Vec::new(),
        }
    }
}

/// Reads a fleet snapshot (a JSON array of vehicles) from disk.
pub fn load_fleet<P: AsRef<Path>>(path: P) -> Result<Vec<Vehicle>, Box<dyn Error>> {
    let file = File::open(path)?;
    let vehicles: Vec<Vehicle> = serde_json::from_reader(BufReader::new(file))?;
    Ok(vehicles)
}
