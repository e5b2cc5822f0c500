//! Great-circle math and zone containment.

use crate::models::Zone;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points given in decimal degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Point reached by travelling `distance_m` from (`lat`, `lon`) along `bearing_rad`
/// (0 = north, π/2 = east). Returns (lat, lon) in degrees.
pub fn offset_by_bearing(lat: f64, lon: f64, distance_m: f64, bearing_rad: f64) -> (f64, f64) {
    if distance_m.abs() <= f64::EPSILON {
        return (lat, lon);
    }

    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    (lat2.to_degrees(), lon2.to_degrees())
}

impl Zone {
    /// True if the point lies strictly within the zone radius of its centroid.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return false;
        }
        haversine_distance(lat, lon, self.latitude, self.longitude) < self.radius_m
    }
}

/// All zones containing the point, in input order.
pub fn zones_containing<'a>(zones: &'a [Zone], lat: f64, lon: f64) -> Vec<&'a Zone> {
    zones.iter().filter(|zone| zone.contains(lat, lon)).collect()
}
