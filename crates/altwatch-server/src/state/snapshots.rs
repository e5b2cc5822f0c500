//! Latest-position store using DashMap.

use async_trait::async_trait;
use dashmap::DashMap;

use altwatch_core::AircraftSnapshot;

use crate::error::SourceError;

/// Read access to the latest known state of every tracked aircraft.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Full scan, no ordering guarantee.
    async fn list_all(&self) -> Result<Vec<AircraftSnapshot>, SourceError>;

    async fn get(&self, callsign: &str) -> Result<Option<AircraftSnapshot>, SourceError>;
}

/// Thread-safe in-process snapshot store, overwritten by ingestion.
#[derive(Default)]
pub struct SnapshotStore {
    aircraft: DashMap<String, AircraftSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest snapshot for an aircraft.
    ///
    /// Older observations never overwrite newer ones.
    pub fn upsert(&self, snapshot: AircraftSnapshot) {
        self.aircraft
            .entry(snapshot.callsign.clone())
            .and_modify(|existing| {
                if snapshot.observed_at >= existing.observed_at {
                    *existing = snapshot.clone();
                }
            })
            .or_insert(snapshot);
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }
}

#[async_trait]
impl SnapshotSource for SnapshotStore {
    async fn list_all(&self) -> Result<Vec<AircraftSnapshot>, SourceError> {
        Ok(self.aircraft.iter().map(|r| r.value().clone()).collect())
    }

    async fn get(&self, callsign: &str) -> Result<Option<AircraftSnapshot>, SourceError> {
        Ok(self.aircraft.get(callsign).map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn upsert_keeps_latest_observation() {
        let store = SnapshotStore::new();
        let now = Utc::now();

        let mut newer = AircraftSnapshot::new("AC1", 800.0, 40.0, -73.0);
        newer.observed_at = now;
        let mut older = AircraftSnapshot::new("AC1", 300.0, 40.0, -73.0);
        older.observed_at = now - Duration::seconds(10);

        store.upsert(newer);
        store.upsert(older);

        let current = store.get("AC1").await.unwrap().unwrap();
        assert_eq!(current.altitude_ft, Some(800.0));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_aircraft_is_none() {
        let store = SnapshotStore::new();
        assert!(store.get("UNKNOWN").await.unwrap().is_none());
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
