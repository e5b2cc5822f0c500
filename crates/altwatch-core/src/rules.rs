//! Safety rules and thresholds for low-altitude monitoring.

use serde::{Deserialize, Serialize};

use crate::models::{AircraftSnapshot, Position, Severity};

/// Below this altitude (ft) a hazard is critical.
pub const CRITICAL_BELOW_FT: f64 = 500.0;
/// Below this altitude (ft) a hazard is high severity.
pub const HIGH_BELOW_FT: f64 = 750.0;
/// Default minimum safe altitude outside airport zones (ft).
pub const DEFAULT_MIN_SAFE_ALTITUDE_FT: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RulesError {
    #[error("minimum safe altitude must be a positive finite number of feet, got {0}")]
    InvalidThreshold(f64),
}

/// Map an altitude to a severity tier.
///
/// Only meaningful for altitudes already below the safe threshold, so
/// `Medium` is reachable only when the threshold exceeds 750 ft.
pub fn classify_severity(altitude_ft: f64) -> Severity {
    if altitude_ft < CRITICAL_BELOW_FT {
        Severity::Critical
    } else if altitude_ft < HIGH_BELOW_FT {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Configuration for the low-altitude rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeRules {
    /// Minimum safe altitude in feet outside airport zones
    pub min_safe_altitude_ft: f64,
}

impl Default for AltitudeRules {
    fn default() -> Self {
        Self {
            min_safe_altitude_ft: DEFAULT_MIN_SAFE_ALTITUDE_FT,
        }
    }
}

impl AltitudeRules {
    pub fn new(min_safe_altitude_ft: f64) -> Result<Self, RulesError> {
        if !min_safe_altitude_ft.is_finite() || min_safe_altitude_ft <= 0.0 {
            return Err(RulesError::InvalidThreshold(min_safe_altitude_ft));
        }
        Ok(Self { min_safe_altitude_ft })
    }

    /// Returns the altitude and position of an airborne aircraft flying below
    /// the threshold, or `None` if the snapshot is on the ground, incomplete,
    /// or at a safe altitude. Zone containment is decided separately.
    pub fn hazard_candidate(&self, snapshot: &AircraftSnapshot) -> Option<(f64, Position)> {
        if snapshot.callsign.trim().is_empty() || snapshot.on_ground {
            return None;
        }
        let altitude = snapshot.altitude()?;
        if altitude >= self.min_safe_altitude_ft {
            return None;
        }
        let position = snapshot.position()?;
        Some((altitude, position))
    }

    pub fn is_safe(&self, altitude_ft: f64, inside_zone: bool) -> bool {
        altitude_ft >= self.min_safe_altitude_ft || inside_zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_boundaries_are_exact() {
        assert_eq!(classify_severity(499.9), Severity::Critical);
        assert_eq!(classify_severity(500.0), Severity::High);
        assert_eq!(classify_severity(749.9), Severity::High);
        assert_eq!(classify_severity(750.0), Severity::Medium);
    }

    #[test]
    fn severity_extremes() {
        assert_eq!(classify_severity(-20.0), Severity::Critical);
        assert_eq!(classify_severity(0.0), Severity::Critical);
        assert_eq!(classify_severity(999.0), Severity::Medium);
    }

    #[test]
    fn rejects_invalid_threshold() {
        assert!(AltitudeRules::new(0.0).is_err());
        assert!(AltitudeRules::new(-100.0).is_err());
        assert!(AltitudeRules::new(f64::NAN).is_err());
        assert!(AltitudeRules::new(f64::INFINITY).is_err());
        assert_eq!(AltitudeRules::new(1000.0).unwrap(), AltitudeRules::default());
    }

    #[test]
    fn on_ground_is_never_a_candidate() {
        let rules = AltitudeRules::default();
        for altitude in [0.0, 100.0, 999.0, 5000.0] {
            let snapshot = AircraftSnapshot::new("AC1", altitude, 40.0, -73.0).on_ground(true);
            assert!(rules.hazard_candidate(&snapshot).is_none());
        }
    }

    #[test]
    fn at_or_above_threshold_is_not_a_candidate() {
        let rules = AltitudeRules::default();
        let snapshot = AircraftSnapshot::new("AC1", 1000.0, 40.0, -73.0);
        assert!(rules.hazard_candidate(&snapshot).is_none());
        let snapshot = AircraftSnapshot::new("AC1", 35000.0, 40.0, -73.0);
        assert!(rules.hazard_candidate(&snapshot).is_none());
    }

    #[test]
    fn incomplete_snapshots_are_skipped() {
        let rules = AltitudeRules::default();

        let mut missing_altitude = AircraftSnapshot::new("AC1", 100.0, 40.0, -73.0);
        missing_altitude.altitude_ft = None;
        assert!(rules.hazard_candidate(&missing_altitude).is_none());

        let blank_callsign = AircraftSnapshot::new("  ", 100.0, 40.0, -73.0);
        assert!(rules.hazard_candidate(&blank_callsign).is_none());
    }

    #[test]
    fn low_airborne_aircraft_is_a_candidate() {
        let rules = AltitudeRules::default();
        let snapshot = AircraftSnapshot::new("AC100", 450.0, 40.0, -73.0);
        let (altitude, position) = rules.hazard_candidate(&snapshot).unwrap();
        assert_eq!(altitude, 450.0);
        assert_eq!(position, Position::new(40.0, -73.0));
    }

    #[test]
    fn safety_predicate() {
        let rules = AltitudeRules::default();
        assert!(rules.is_safe(1000.0, false));
        assert!(rules.is_safe(200.0, true));
        assert!(!rules.is_safe(999.9, false));
    }
}
