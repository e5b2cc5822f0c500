//! Failure domains for external collaborators.

use std::time::Duration;

/// Alert store failures. Always recovered by the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("alert store timed out after {0:?}")]
    Timeout(Duration),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("alert encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("alert store unavailable: {0}")]
    Unavailable(String),
}

/// Primary zone query failures. Never surfaced past the zone oracle.
#[derive(Debug, thiserror::Error)]
pub enum ZoneQueryError {
    #[error("zone query timed out after {0:?}")]
    Timeout(Duration),
    #[error("zone service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("zone service returned status {0}")]
    Status(u16),
    #[error("zone service unavailable: {0}")]
    Unavailable(String),
}

/// Zone seed file failures. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ZonesFileError {
    #[error("zones file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("zones file is not a JSON zone list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Position snapshot source failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),
}
