//! Locally held zone list for the simplified containment check.

use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::fs;

use altwatch_core::Zone;

use super::ZoneQuery;
use crate::error::{ZoneQueryError, ZonesFileError};

#[derive(Default)]
pub struct LocalZones {
    zones: RwLock<Vec<Zone>>,
}

impl LocalZones {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self {
            zones: RwLock::new(sanitize(zones)),
        }
    }

    /// Swap in a fresh zone list. Zones without a usable centroid or radius are dropped.
    pub fn replace(&self, zones: Vec<Zone>) {
        let zones = sanitize(zones);
        let mut guard = self.zones.write().unwrap_or_else(|e| e.into_inner());
        *guard = zones;
    }

    pub fn list(&self) -> Vec<Zone> {
        self.zones.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.zones.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first_containing(&self, lat: f64, lon: f64) -> Option<Zone> {
        self.zones
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|zone| zone.contains(lat, lon))
            .cloned()
    }
}

#[async_trait]
impl ZoneQuery for LocalZones {
    async fn zones_containing(&self, lat: f64, lon: f64) -> Result<Vec<Zone>, ZoneQueryError> {
        let zones = self.zones.read().unwrap_or_else(|e| e.into_inner());
        Ok(altwatch_core::zones_containing(&zones, lat, lon)
            .into_iter()
            .cloned()
            .collect())
    }
}

fn sanitize(zones: Vec<Zone>) -> Vec<Zone> {
    zones
        .into_iter()
        .filter(|zone| {
            let usable = zone.centroid().is_valid() && zone.radius_m.is_finite() && zone.radius_m > 0.0;
            if !usable {
                tracing::warn!("Ignoring malformed zone '{}'", zone.name);
            }
            usable
        })
        .collect()
}

/// Load a JSON array of zones. A missing file yields an empty list.
pub async fn load_zones_file(path: &Path) -> Result<Vec<Zone>, ZonesFileError> {
    if !path.exists() {
        tracing::warn!("Zones file {} not found; starting with no local zones", path.display());
        return Ok(Vec::new());
    }
    let bytes = fs::read(path).await?;
    let zones = serde_json::from_slice::<Vec<Zone>>(&bytes)?;
    Ok(zones)
}
