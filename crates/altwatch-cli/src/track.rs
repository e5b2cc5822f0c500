//! Simulated descending approach track.

use altwatch_core::spatial::offset_by_bearing;

const FPM_TO_FPS: f64 = 1.0 / 60.0;

/// Straight-line track that sinks at a constant rate until it reaches a floor.
#[derive(Debug, Clone)]
pub struct DescendingTrack {
    pub start_lat: f64,
    pub start_lon: f64,
    /// Degrees, 0 = north.
    pub heading_deg: f64,
    pub speed_mps: f64,
    pub start_altitude_ft: f64,
    pub descent_fpm: f64,
    pub floor_ft: f64,
}

impl DescendingTrack {
    pub fn new(
        start_lat: f64,
        start_lon: f64,
        heading_deg: f64,
        speed_mps: f64,
        start_altitude_ft: f64,
        descent_fpm: f64,
        floor_ft: f64,
    ) -> Self {
        Self {
            start_lat,
            start_lon,
            heading_deg,
            speed_mps,
            start_altitude_ft,
            descent_fpm,
            floor_ft,
        }
    }

    /// (lat, lon, altitude_ft) at `t` seconds from start.
    pub fn position(&self, t: f64) -> (f64, f64, f64) {
        let t = t.max(0.0);
        let (lat, lon) = offset_by_bearing(
            self.start_lat,
            self.start_lon,
            self.speed_mps * t,
            self.heading_deg.to_radians(),
        );
        (lat, lon, self.altitude_at(t))
    }

    pub fn altitude_at(&self, t: f64) -> f64 {
        let descended = self.descent_fpm * FPM_TO_FPS * t.max(0.0);
        (self.start_altitude_ft - descended).max(self.floor_ft)
    }

    /// Seconds until the track first drops below `altitude_ft`, if it ever does.
    pub fn time_to_cross(&self, altitude_ft: f64) -> Option<f64> {
        if self.start_altitude_ft < altitude_ft {
            return Some(0.0);
        }
        if self.floor_ft >= altitude_ft || self.descent_fpm <= 0.0 {
            return None;
        }
        Some((self.start_altitude_ft - altitude_ft) / (self.descent_fpm * FPM_TO_FPS))
    }
}
