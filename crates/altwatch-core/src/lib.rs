pub mod models;
pub mod rules;
pub mod spatial;

pub use models::{
    AircraftSnapshot, Alert, AltitudeStatus, ContainmentSource, Position, Severity, Zone,
    ZoneMatch, LOW_ALTITUDE_MESSAGE,
};
pub use rules::{classify_severity, AltitudeRules, RulesError};
pub use spatial::{haversine_distance, zones_containing};
