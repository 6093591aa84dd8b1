// route_progress.rs
//
// Tracks how far each vehicle has travelled along a road polyline supplied
// by the routing collaborator. The tracker is owned by whoever simulates
// movement and passed around by reference; there is no process-wide cache.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::position::Position;
use crate::models::vehicle::Vehicle;
use crate::status_engine::geometry::distance;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Progress of one vehicle along its road route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteProgress {
    pub coordinates: Vec<Position>,
    /// Index of the polyline point the vehicle last passed.
    pub current_index: usize,
    /// Kilometres already covered on the segment starting at `current_index`.
    pub segment_offset_km: f64,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct RouteTracker {
    routes: HashMap<String, RouteProgress>,
}

impl RouteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `coordinates` for a vehicle, replacing any previous
    /// route. Returns `false` (and tracks nothing) for an empty route.
    pub fn assign_route(
        &mut self,
        vehicle_id: &str,
        coordinates: Vec<Position>,
        now: DateTime<Utc>,
    ) -> bool {
        if coordinates.is_empty() {
            log::warn!("No road route for vehicle {}, falling back to direct movement", vehicle_id);
            return false;
        }
        log::debug!("Route assigned to vehicle {}: {} points", vehicle_id, coordinates.len());
        self.routes.insert(
            vehicle_id.to_string(),
            RouteProgress {
                coordinates,
                current_index: 0,
                segment_offset_km: 0.0,
                last_update: now,
            },
        );
        true
    }

    pub fn has_route(&self, vehicle_id: &str) -> bool {
        self.routes.contains_key(vehicle_id)
    }

    pub fn progress(&self, vehicle_id: &str) -> Option<&RouteProgress> {
        self.routes.get(vehicle_id)
    }

    pub fn clear(&mut self, vehicle_id: &str) {
        self.routes.remove(vehicle_id);
    }

    /// Share of route points already passed, 0–100. Zero when untracked.
    pub fn progress_percent(&self, vehicle_id: &str) -> f64 {
        match self.routes.get(vehicle_id) {
            Some(progress) => {
                progress.current_index as f64 / progress.coordinates.len() as f64 * 100.0
            }
            None => 0.0,
        }
    }

    /// Moves the vehicle `current_speed * interval_secs` along its route.
    ///
    /// Returns `None` when the vehicle has no tracked route. When the end of
    /// the polyline is reached the route is dropped and the destination is
    /// returned.
    pub fn next_road_position(
        &mut self,
        vehicle: &Vehicle,
        interval_secs: f64,
        now: DateTime<Utc>,
    ) -> Option<Position> {
        let progress = self.routes.get_mut(&vehicle.id)?;

        let step_km = vehicle.current_speed * interval_secs / SECONDS_PER_HOUR;
        let mut remaining = progress.segment_offset_km + step_km;
        let mut index = progress.current_index;
        let last = progress.coordinates.len() - 1;

        while index < last {
            let from = progress.coordinates[index];
            let to = progress.coordinates[index + 1];
            let segment = distance(from, to);

            if remaining >= segment {
                remaining -= segment;
                index += 1;
                continue;
            }

            let ratio = remaining / segment;
            progress.current_index = index;
            progress.segment_offset_km = remaining;
            progress.last_update = now;
            return Some(Position::new(
                from.lat + (to.lat - from.lat) * ratio,
                from.lng + (to.lng - from.lng) * ratio,
            ));
        }

        log::info!("Vehicle {} reached the end of its road route", vehicle.id);
        self.routes.remove(&vehicle.id);
        Some(vehicle.destination.position())
    }
}
