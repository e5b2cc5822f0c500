//! Core data models for low-altitude monitoring.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::classify_severity;

/// Message attached to every low-altitude alert.
pub const LOW_ALTITUDE_MESSAGE: &str = "Aircraft flying below safe altitude outside airport zone";

/// Key prefix for individually persisted alerts.
pub const ALERT_KEY_PREFIX: &str = "alert:low-altitude:";

/// Latest observed state of one aircraft.
///
/// Produced and overwritten by upstream ingestion; the monitor only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftSnapshot {
    pub callsign: String,
    /// Altitude in feet. Absent when the feed has not reported one yet.
    #[serde(rename = "altitude", default)]
    pub altitude_ft: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub on_ground: bool,
    #[serde(default = "Utc::now")]
    pub observed_at: DateTime<Utc>,
}

impl AircraftSnapshot {
    pub fn new(callsign: impl Into<String>, altitude_ft: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            callsign: callsign.into(),
            altitude_ft: Some(altitude_ft),
            latitude,
            longitude,
            on_ground: false,
            observed_at: Utc::now(),
        }
    }

    pub fn on_ground(mut self, on_ground: bool) -> Self {
        self.on_ground = on_ground;
        self
    }

    /// Altitude, if present and finite.
    pub fn altitude(&self) -> Option<f64> {
        self.altitude_ft.filter(|alt| alt.is_finite())
    }

    /// Position, if both coordinates are finite and in range.
    pub fn position(&self) -> Option<Position> {
        let position = Position::new(self.latitude, self.longitude);
        position.is_valid().then_some(position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Circular protected zone around an airport reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub airport: String,
}

impl Zone {
    pub fn centroid(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

/// Hazard ranking derived from altitude alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raised low-altitude alert. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub callsign: String,
    #[serde(rename = "altitude")]
    pub altitude_ft: f64,
    pub position: Position,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Build an alert for an aircraft detected below the safe altitude.
    ///
    /// The creation instant is truncated to milliseconds, which is also the
    /// resolution of the id suffix.
    pub fn low_altitude(
        callsign: &str,
        altitude_ft: f64,
        position: Position,
        created_at: DateTime<Utc>,
    ) -> Self {
        let timestamp = created_at.trunc_subsecs(3);
        Self {
            id: format!("{}-{}", callsign, timestamp.timestamp_millis()),
            callsign: callsign.to_string(),
            altitude_ft,
            position,
            severity: classify_severity(altitude_ft),
            message: LOW_ALTITUDE_MESSAGE.to_string(),
            timestamp,
        }
    }

    /// Storage key for the individually expiring copy of this alert.
    pub fn store_key(&self) -> String {
        format!("{}{}", ALERT_KEY_PREFIX, self.id)
    }
}

/// Which containment tier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainmentSource {
    /// Geospatial query against the zone service
    Primary,
    /// Local point-in-circle check after the primary failed
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneMatch {
    pub zone: String,
    pub airport: String,
}

impl From<&Zone> for ZoneMatch {
    fn from(zone: &Zone) -> Self {
        Self {
            zone: zone.name.clone(),
            airport: zone.airport.clone(),
        }
    }
}

/// Point-in-time safety view of one aircraft. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltitudeStatus {
    pub callsign: String,
    #[serde(rename = "altitude")]
    pub altitude_ft: f64,
    pub position: Position,
    pub in_airport_zone: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub zone: Option<ZoneMatch>,
    pub containment_source: ContainmentSource,
    pub is_safe: bool,
    #[serde(rename = "min_safe_altitude")]
    pub min_safe_altitude_ft: f64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn alert_serializes_to_record_shape() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let alert = Alert::low_altitude("AC100", 450.0, Position::new(40.0, -73.0), created);

        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["id"], json!(format!("AC100-{}", created.timestamp_millis())));
        assert_eq!(value["altitude"], json!(450.0));
        assert_eq!(value["position"], json!({"latitude": 40.0, "longitude": -73.0}));
        assert_eq!(value["severity"], json!("CRITICAL"));
        assert_eq!(value["message"], json!(LOW_ALTITUDE_MESSAGE));
        assert!(value["timestamp"].as_str().unwrap().starts_with("2026-03-01T12:00:00"));
    }

    #[test]
    fn alert_timestamp_is_millisecond_resolution() {
        let created = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let alert = Alert::low_altitude("AC1", 100.0, Position::new(0.0, 0.0), created);
        assert_eq!(alert.timestamp.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(alert.store_key(), "alert:low-altitude:AC1-1700000000123");
    }

    #[test]
    fn snapshot_deserializes_with_defaults() {
        let snapshot: AircraftSnapshot = serde_json::from_value(json!({
            "callsign": "AC300",
            "latitude": 51.47,
            "longitude": -0.45
        }))
        .unwrap();
        assert_eq!(snapshot.altitude(), None);
        assert!(!snapshot.on_ground);
    }

    #[test]
    fn snapshot_rejects_invalid_position() {
        let snapshot = AircraftSnapshot::new("AC1", 500.0, 123.0, 0.0);
        assert!(snapshot.position().is_none());

        let snapshot = AircraftSnapshot::new("AC1", 500.0, f64::NAN, 0.0);
        assert!(snapshot.position().is_none());
    }
}
