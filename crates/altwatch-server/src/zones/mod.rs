//! Airport zone containment.
//!
//! Two tiers answer "is this point inside a protected zone": a primary
//! geospatial query and a local point-in-circle check over a held zone list.
//! The oracle always produces an answer; a failing primary degrades to the
//! local list and the result is tagged with the tier that answered.

pub mod local;
pub mod remote;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use altwatch_core::{ContainmentSource, Zone, ZoneMatch};

use crate::error::ZoneQueryError;

pub use local::LocalZones;
pub use remote::HttpZoneQuery;

/// Geospatial point query against zone reference data.
#[async_trait]
pub trait ZoneQuery: Send + Sync {
    /// Zones whose radius contains the point.
    async fn zones_containing(&self, lat: f64, lon: f64) -> Result<Vec<Zone>, ZoneQueryError>;
}

/// Containment answer tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Containment {
    pub matched: Option<ZoneMatch>,
    pub source: ContainmentSource,
}

impl Containment {
    pub fn inside(&self) -> bool {
        self.matched.is_some()
    }

    pub fn is_degraded(&self) -> bool {
        self.source == ContainmentSource::Fallback
    }
}

pub struct ZoneOracle {
    primary: Arc<dyn ZoneQuery>,
    fallback: Arc<LocalZones>,
    timeout: Duration,
}

impl ZoneOracle {
    pub fn new(primary: Arc<dyn ZoneQuery>, fallback: Arc<LocalZones>, timeout: Duration) -> Self {
        Self {
            primary,
            fallback,
            timeout,
        }
    }

    /// Oracle answering from the local zone list alone.
    pub fn local(zones: Arc<LocalZones>, timeout: Duration) -> Self {
        Self::new(zones.clone(), zones, timeout)
    }

    pub fn fallback_zones(&self) -> &Arc<LocalZones> {
        &self.fallback
    }

    /// Check a point. Never fails: primary errors and timeouts fall back to
    /// the local list.
    pub async fn contains(&self, lat: f64, lon: f64) -> Containment {
        match tokio::time::timeout(self.timeout, self.primary.zones_containing(lat, lon)).await {
            Ok(Ok(zones)) => Containment {
                matched: zones.first().map(ZoneMatch::from),
                source: ContainmentSource::Primary,
            },
            Ok(Err(err)) => {
                tracing::warn!("Zone query failed, using local zones: {}", err);
                self.fallback_check(lat, lon)
            }
            Err(_) => {
                tracing::warn!(
                    "Zone query failed, using local zones: {}",
                    ZoneQueryError::Timeout(self.timeout)
                );
                self.fallback_check(lat, lon)
            }
        }
    }

    fn fallback_check(&self, lat: f64, lon: f64) -> Containment {
        Containment {
            matched: self.fallback.first_containing(lat, lon).as_ref().map(ZoneMatch::from),
            source: ContainmentSource::Fallback,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use altwatch_core::spatial::offset_by_bearing;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn runway_zone() -> Zone {
        Zone {
            name: "RWY-09".to_string(),
            latitude: 40.6413,
            longitude: -73.7781,
            radius_m: 2000.0,
            airport: "JFK".to_string(),
        }
    }

    /// Primary tier that always errors.
    pub(crate) struct FailingZoneQuery {
        pub calls: AtomicUsize,
    }

    impl FailingZoneQuery {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ZoneQuery for FailingZoneQuery {
        async fn zones_containing(&self, _lat: f64, _lon: f64) -> Result<Vec<Zone>, ZoneQueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ZoneQueryError::Unavailable("connection refused".to_string()))
        }
    }

    /// Primary tier that never answers.
    struct HangingZoneQuery;

    #[async_trait]
    impl ZoneQuery for HangingZoneQuery {
        async fn zones_containing(&self, _lat: f64, _lon: f64) -> Result<Vec<Zone>, ZoneQueryError> {
            std::future::pending().await
        }
    }

    /// Primary tier that disagrees with the local list.
    struct EverywhereZoneQuery;

    #[async_trait]
    impl ZoneQuery for EverywhereZoneQuery {
        async fn zones_containing(&self, _lat: f64, _lon: f64) -> Result<Vec<Zone>, ZoneQueryError> {
            Ok(vec![runway_zone()])
        }
    }

    fn local() -> Arc<LocalZones> {
        Arc::new(LocalZones::new(vec![runway_zone()]))
    }

    #[tokio::test]
    async fn primary_answer_is_used() {
        let oracle = ZoneOracle::new(Arc::new(EverywhereZoneQuery), local(), Duration::from_secs(1));
        let result = oracle.contains(0.0, 0.0).await;
        assert!(result.inside());
        assert_eq!(result.source, ContainmentSource::Primary);
        assert_eq!(result.matched.unwrap().zone, "RWY-09");
    }

    #[tokio::test]
    async fn primary_failure_falls_back_to_local_zones() {
        let primary = Arc::new(FailingZoneQuery::new());
        let oracle = ZoneOracle::new(primary.clone(), local(), Duration::from_secs(1));

        let zone = runway_zone();
        let (lat, lon) = offset_by_bearing(zone.latitude, zone.longitude, 1200.0, 2.0);
        let inside = oracle.contains(lat, lon).await;
        assert!(inside.inside());
        assert!(inside.is_degraded());

        let outside = oracle.contains(0.0, 0.0).await;
        assert!(!outside.inside());
        assert_eq!(outside.source, ContainmentSource::Fallback);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn primary_timeout_falls_back() {
        let oracle = ZoneOracle::new(Arc::new(HangingZoneQuery), local(), Duration::from_millis(50));
        let zone = runway_zone();
        let result = oracle.contains(zone.latitude, zone.longitude).await;
        assert!(result.inside());
        assert!(result.is_degraded());
    }

    #[tokio::test]
    async fn local_oracle_answers_as_primary() {
        let oracle = ZoneOracle::local(local(), Duration::from_secs(1));
        let zone = runway_zone();
        let result = oracle.contains(zone.latitude, zone.longitude).await;
        assert!(result.inside());
        assert_eq!(result.source, ContainmentSource::Primary);
    }
}
