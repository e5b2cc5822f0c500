//! Read path for alerts and per-aircraft altitude status.

use std::sync::Arc;

use chrono::Utc;

use altwatch_core::{Alert, AltitudeRules, AltitudeStatus};

use crate::alerts::TimedAlertStore;
use crate::error::{SourceError, StoreError};
use crate::state::SnapshotSource;
use crate::zones::ZoneOracle;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

pub struct AlertQueryService {
    snapshots: Arc<dyn SnapshotSource>,
    zones: Arc<ZoneOracle>,
    alerts: TimedAlertStore,
    rules: AltitudeRules,
}

impl AlertQueryService {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        zones: Arc<ZoneOracle>,
        alerts: TimedAlertStore,
        rules: AltitudeRules,
    ) -> Self {
        Self {
            snapshots,
            zones,
            alerts,
            rules,
        }
    }

    pub async fn active_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        self.alerts.list_active().await
    }

    /// `Ok(None)` when the aircraft is unknown or has no usable altitude or position.
    pub async fn aircraft_altitude_status(
        &self,
        callsign: &str,
    ) -> Result<Option<AltitudeStatus>, SourceError> {
        let Some(snapshot) = self.snapshots.get(callsign).await? else {
            return Ok(None);
        };
        let (Some(altitude_ft), Some(position)) = (snapshot.altitude(), snapshot.position()) else {
            return Ok(None);
        };

        let containment = self
            .zones
            .contains(position.latitude, position.longitude)
            .await;
        let in_airport_zone = containment.inside();

        Ok(Some(AltitudeStatus {
            callsign: snapshot.callsign,
            altitude_ft,
            position,
            in_airport_zone,
            zone: containment.matched,
            containment_source: containment.source,
            is_safe: self.rules.is_safe(altitude_ft, in_airport_zone),
            min_safe_altitude_ft: self.rules.min_safe_altitude_ft,
            timestamp: Utc::now(),
        }))
    }

    pub async fn alert_history(&self, limit: usize) -> Result<Vec<Alert>, StoreError> {
        self.alerts.list_history(limit).await
    }
}
