//! Keep the local fallback zone list in step with the zone service.
//!
//! A failed refresh leaves the previous list in place and backs off.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::interval;

use crate::backoff::Backoff;
use crate::zones::{HttpZoneQuery, LocalZones};

const ZONE_REFRESH_BACKOFF_MAX_SECS: u64 = 600;

pub async fn run_zone_refresh_loop(
    remote: Arc<HttpZoneQuery>,
    zones: Arc<LocalZones>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(period);
    let mut backoff = Backoff::new(period, Duration::from_secs(ZONE_REFRESH_BACKOFF_MAX_SECS));

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::info!("Zone refresh loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                if backoff.ready() {
                    refresh_zones(&remote, &zones, &mut backoff).await;
                }
            }
        }
    }
}

/// One refresh attempt. On failure the current list is kept and the backoff grows.
pub async fn refresh_zones(
    remote: &HttpZoneQuery,
    zones: &LocalZones,
    backoff: &mut Backoff,
) -> bool {
    match remote.list_zones().await {
        Ok(fresh) => {
            let count = fresh.len();
            zones.replace(fresh);
            if backoff.failures() > 0 {
                tracing::info!("Zone service reachable again");
            }
            backoff.reset();
            tracing::debug!("Refreshed {} local zone(s)", count);
            true
        }
        Err(err) => {
            let delay = backoff.fail();
            tracing::warn!(
                "Zone refresh failed: {} (keeping {} cached zone(s), backing off {:?})",
                err,
                zones.len(),
                delay
            );
            false
        }
    }
}
