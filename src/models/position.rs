use serde::{Deserialize, Serialize};

/// A WGS84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Delivery drop-off: a point plus the address shown to dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Destination {
    pub fn new(position: Position, address: impl Into<String>) -> Self {
        Self {
            lat: position.lat,
            lng: position.lng,
            address: address.into(),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lng)
    }
}
