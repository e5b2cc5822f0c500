//! Server configuration from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use altwatch_core::rules::{AltitudeRules, RulesError, DEFAULT_MIN_SAFE_ALTITUDE_FT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub min_safe_altitude_ft: f64,
    pub check_interval_secs: u64,
    pub alert_ttl_secs: u64,
    pub active_alert_cap: usize,
    /// SQLite alert store path. In-memory store when unset.
    pub database_path: Option<String>,
    pub database_max_connections: u32,
    /// Geospatial zone service. Local zones answer directly when unset.
    pub zone_service_url: Option<String>,
    pub zones_path: String,
    pub zone_query_timeout_ms: u64,
    pub zone_refresh_secs: u64,
    pub store_timeout_ms: u64,
    pub containment_concurrency: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            min_safe_altitude_ft: DEFAULT_MIN_SAFE_ALTITUDE_FT,
            check_interval_secs: 5,
            alert_ttl_secs: 300,
            active_alert_cap: 100,
            database_path: None,
            database_max_connections: 4,
            zone_service_url: None,
            zones_path: "data/zones.json".to_string(),
            zone_query_timeout_ms: 750,
            zone_refresh_secs: 60,
            store_timeout_ms: 2000,
            containment_concurrency: 8,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("ALTWATCH_PORT").unwrap_or(defaults.server_port),
            min_safe_altitude_ft: parse_env("MIN_SAFE_ALTITUDE_FT")
                .unwrap_or(defaults.min_safe_altitude_ft),
            check_interval_secs: parse_env("ALTITUDE_CHECK_INTERVAL")
                .unwrap_or(defaults.check_interval_secs),
            alert_ttl_secs: parse_env("ALERT_TTL_SECS").unwrap_or(defaults.alert_ttl_secs),
            active_alert_cap: parse_env("ACTIVE_ALERT_CAP").unwrap_or(defaults.active_alert_cap),
            database_path: non_empty_env("ALERT_DB_PATH"),
            database_max_connections: parse_env("ALERT_DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.database_max_connections),
            zone_service_url: non_empty_env("ZONE_SERVICE_URL"),
            zones_path: non_empty_env("ZONES_PATH").unwrap_or(defaults.zones_path),
            zone_query_timeout_ms: parse_env("ZONE_QUERY_TIMEOUT_MS")
                .unwrap_or(defaults.zone_query_timeout_ms),
            zone_refresh_secs: parse_env("ZONE_REFRESH_SECS").unwrap_or(defaults.zone_refresh_secs),
            store_timeout_ms: parse_env("STORE_TIMEOUT_MS").unwrap_or(defaults.store_timeout_ms),
            containment_concurrency: parse_env("CONTAINMENT_CONCURRENCY")
                .unwrap_or(defaults.containment_concurrency),
            log_format: match env::var("LOG_FORMAT").map(|s| s.to_lowercase()).as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    /// Reject values the monitor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules()?;
        let positive = [
            ("ALTITUDE_CHECK_INTERVAL", self.check_interval_secs),
            ("ALERT_TTL_SECS", self.alert_ttl_secs),
            ("ACTIVE_ALERT_CAP", self.active_alert_cap as u64),
            ("CONTAINMENT_CONCURRENCY", self.containment_concurrency as u64),
            ("ZONE_QUERY_TIMEOUT_MS", self.zone_query_timeout_ms),
            ("STORE_TIMEOUT_MS", self.store_timeout_ms),
            ("ZONE_REFRESH_SECS", self.zone_refresh_secs),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Zero { name });
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> Result<AltitudeRules, RulesError> {
        AltitudeRules::new(self.min_safe_altitude_ft)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn alert_ttl(&self) -> Duration {
        Duration::from_secs(self.alert_ttl_secs)
    }

    pub fn zone_query_timeout(&self) -> Duration {
        Duration::from_millis(self.zone_query_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.check_interval(), Duration::from_secs(5));
        assert_eq!(config.alert_ttl(), Duration::from_secs(300));
        assert_eq!(config.active_alert_cap, 100);
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let config = Config {
            min_safe_altitude_ft: -1.0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Rules(_))));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = Config {
            check_interval_secs: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Zero { name: "ALTITUDE_CHECK_INTERVAL" })
        ));
    }
}
