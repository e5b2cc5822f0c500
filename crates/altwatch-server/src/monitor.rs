//! Low-altitude hazard detection cycle.
//!
//! A cycle scans every known aircraft, checks airborne aircraft below the
//! safe altitude against the airport zones and raises an alert for each one
//! outside all zones. Alerts are raised on every cycle the condition holds;
//! a persisting hazard is re-confirmed each cycle rather than suppressed.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use tokio::sync::Mutex;

use altwatch_core::{Alert, AltitudeRules, Position};

use crate::alerts::{PersistOutcome, TimedAlertStore};
use crate::state::SnapshotSource;
use crate::zones::ZoneOracle;

pub struct AltitudeMonitor {
    snapshots: Arc<dyn SnapshotSource>,
    zones: Arc<ZoneOracle>,
    alerts: TimedAlertStore,
    rules: AltitudeRules,
    containment_concurrency: usize,
    /// Serializes cycles, including across a loop restart. Holds the
    /// creation instant of the most recent alerts.
    cycle: Mutex<Option<DateTime<Utc>>>,
}

impl AltitudeMonitor {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        zones: Arc<ZoneOracle>,
        alerts: TimedAlertStore,
        rules: AltitudeRules,
        containment_concurrency: usize,
    ) -> Self {
        Self {
            snapshots,
            zones,
            alerts,
            rules,
            containment_concurrency: containment_concurrency.max(1),
            cycle: Mutex::new(None),
        }
    }

    pub fn rules(&self) -> AltitudeRules {
        self.rules
    }

    /// Run one cycle and return the alerts it raised.
    ///
    /// Never fails: source errors and panics inside the cycle are logged and
    /// yield an empty result. Store write failures are logged per alert and
    /// the detected alerts are still returned.
    pub async fn check(&self) -> Vec<Alert> {
        let mut last_created = self.cycle.lock().await;
        match AssertUnwindSafe(self.run_cycle(&mut last_created)).catch_unwind().await {
            Ok(alerts) => alerts,
            Err(_) => {
                tracing::error!("Low-altitude check panicked; cycle skipped");
                Vec::new()
            }
        }
    }

    async fn run_cycle(&self, last_created: &mut Option<DateTime<Utc>>) -> Vec<Alert> {
        let snapshots = match self.snapshots.list_all().await {
            Ok(snapshots) => snapshots,
            Err(err) => {
                tracing::error!("Error checking low-altitude aircraft: {}", err);
                return Vec::new();
            }
        };

        let candidates: Vec<(String, f64, Position)> = snapshots
            .iter()
            .filter_map(|snapshot| {
                self.rules
                    .hazard_candidate(snapshot)
                    .map(|(altitude, position)| (snapshot.callsign.clone(), altitude, position))
            })
            .collect();

        tracing::debug!(
            "Altitude check: {} aircraft, {} below {} ft",
            snapshots.len(),
            candidates.len(),
            self.rules.min_safe_altitude_ft
        );

        if candidates.is_empty() {
            return Vec::new();
        }

        let checked: Vec<(String, f64, Position, bool)> = stream::iter(candidates)
            .map(|(callsign, altitude, position)| {
                let zones = self.zones.clone();
                async move {
                    let containment = zones.contains(position.latitude, position.longitude).await;
                    (callsign, altitude, position, containment.inside())
                }
            })
            .buffer_unordered(self.containment_concurrency)
            .collect()
            .await;

        let created_at = next_creation_instant(*last_created, Utc::now());
        *last_created = Some(created_at);
        let mut alerts: Vec<Alert> = checked
            .into_iter()
            .filter(|(_, _, _, inside_zone)| !inside_zone)
            .map(|(callsign, altitude, position, _)| {
                Alert::low_altitude(&callsign, altitude, position, created_at)
            })
            .collect();
        alerts.sort_by(|a, b| a.callsign.cmp(&b.callsign));

        let outcomes =
            futures::future::join_all(alerts.iter().map(|alert| self.alerts.persist(alert))).await;
        let failed = outcomes
            .iter()
            .filter(|outcome| **outcome == PersistOutcome::Failed)
            .count();

        if !alerts.is_empty() {
            tracing::info!("{} low-altitude alert(s) detected", alerts.len());
        }
        if failed > 0 {
            tracing::warn!("{} of {} low-altitude alert(s) not persisted", failed, alerts.len());
        }

        alerts
    }
}

/// Millisecond instant strictly after `previous`. Alert ids carry the
/// creation millisecond, so back-to-back cycles must not share one.
fn next_creation_instant(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = now.trunc_subsecs(3);
    match previous {
        Some(previous) if now <= previous => previous + chrono::Duration::milliseconds(1),
        _ => now,
    }
}
