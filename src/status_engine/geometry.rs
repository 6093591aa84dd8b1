// geometry.rs
//
// Spherical-earth helpers. Everything here uses `EARTH_RADIUS_KM` so that
// distances measured by the engine and positions produced by the simulator
// agree with each other.

use crate::global_variables::EARTH_RADIUS_KM;
use crate::models::position::Position;

/// Great-circle distance in kilometres (Haversine).
///
/// Symmetric in its arguments and exactly zero for identical points.
pub fn distance(p1: Position, p2: Position) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lng = (p2.lng - p1.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + p1.lat.to_radians().cos() * p2.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Point reached after travelling `distance_km` from `origin` along the
/// initial bearing `heading_degrees` (0 = north, clockwise).
pub fn advance(origin: Position, distance_km: f64, heading_degrees: f64) -> Position {
    let heading = heading_degrees.to_radians();
    let angular = distance_km / EARTH_RADIUS_KM;

    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * heading.cos()).asin();
    let lng2 = lng1
        + (heading.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Position::new(lat2.to_degrees(), lng2.to_degrees())
}

/// Initial great-circle bearing from `from` to `to`, in degrees [0, 360).
pub fn initial_bearing(from: Position, to: Position) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}
