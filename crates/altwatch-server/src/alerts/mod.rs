//! Alert persistence: individually expiring alerts plus a capped active list.

pub mod memory;
pub mod sqlite;

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use altwatch_core::Alert;

use crate::error::StoreError;

pub use memory::MemoryAlertStore;
pub use sqlite::SqliteAlertStore;

#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Persist under the alert's key with the store's TTL and push onto the
    /// head of the capped active list.
    async fn put(&self, alert: &Alert) -> Result<(), StoreError>;

    /// Capped active list, newest first.
    async fn list_active(&self) -> Result<Vec<Alert>, StoreError>;

    /// Non-expired alerts, most recent first, at most `limit`.
    async fn list_history(&self, limit: usize) -> Result<Vec<Alert>, StoreError>;
}

/// Result of a best-effort write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Stored,
    Failed,
}

/// Applies a per-call timeout to every store operation and turns write
/// failures into a logged [`PersistOutcome`].
#[derive(Clone)]
pub struct TimedAlertStore {
    inner: Arc<dyn AlertStore>,
    timeout: Duration,
}

impl TimedAlertStore {
    pub fn new(inner: Arc<dyn AlertStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub async fn persist(&self, alert: &Alert) -> PersistOutcome {
        match self.call(self.inner.put(alert)).await {
            Ok(()) => PersistOutcome::Stored,
            Err(err) => {
                tracing::error!("Error storing altitude alert {}: {}", alert.id, err);
                PersistOutcome::Failed
            }
        }
    }

    pub async fn list_active(&self) -> Result<Vec<Alert>, StoreError> {
        self.call(self.inner.list_active()).await
    }

    pub async fn list_history(&self, limit: usize) -> Result<Vec<Alert>, StoreError> {
        self.call(self.inner.list_history(limit)).await
    }

    async fn call<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: std::future::Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .unwrap_or(Err(StoreError::Timeout(self.timeout)))
    }
}

/// Most recent first; equal instants ordered by key.
pub(crate) fn history_order(a: (&str, &Alert), b: (&str, &Alert)) -> Ordering {
    b.1.timestamp.cmp(&a.1.timestamp).then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use altwatch_core::Position;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    pub(crate) fn alert_at(callsign: &str, altitude: f64, created_at: DateTime<Utc>) -> Alert {
        Alert::low_altitude(callsign, altitude, Position::new(40.0, -73.0), created_at)
    }

    pub(crate) fn instant(offset_secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
    }

    /// Store whose every call fails.
    #[derive(Default)]
    pub(crate) struct BrokenStore {
        pub puts: AtomicUsize,
    }

    #[async_trait]
    impl AlertStore for BrokenStore {
        async fn put(&self, _alert: &Alert) -> Result<(), StoreError> {
            self.puts.fetch_add(1, AtomicOrdering::SeqCst);
            Err(StoreError::Unavailable("connection reset".to_string()))
        }

        async fn list_active(&self) -> Result<Vec<Alert>, StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }

        async fn list_history(&self, _limit: usize) -> Result<Vec<Alert>, StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }
    }

    struct StalledStore;

    #[async_trait]
    impl AlertStore for StalledStore {
        async fn put(&self, _alert: &Alert) -> Result<(), StoreError> {
            std::future::pending().await
        }

        async fn list_active(&self) -> Result<Vec<Alert>, StoreError> {
            std::future::pending().await
        }

        async fn list_history(&self, _limit: usize) -> Result<Vec<Alert>, StoreError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn failed_write_is_reported_not_raised() {
        let store = TimedAlertStore::new(Arc::new(BrokenStore::default()), Duration::from_secs(1));
        let outcome = store.persist(&alert_at("AC1", 300.0, instant(0))).await;
        assert_eq!(outcome, PersistOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_store_times_out() {
        let store = TimedAlertStore::new(Arc::new(StalledStore), Duration::from_millis(100));
        assert_eq!(
            store.persist(&alert_at("AC1", 300.0, instant(0))).await,
            PersistOutcome::Failed
        );
        assert!(matches!(
            store.list_active().await,
            Err(StoreError::Timeout(_))
        ));
    }

    #[test]
    fn history_order_breaks_ties_by_key() {
        let a = alert_at("AAA", 100.0, instant(0));
        let b = alert_at("BBB", 100.0, instant(0));
        let newer = alert_at("CCC", 100.0, instant(5));

        let mut entries = vec![
            (b.store_key(), b.clone()),
            (a.store_key(), a.clone()),
            (newer.store_key(), newer.clone()),
        ];
        entries.sort_by(|x, y| history_order((&x.0, &x.1), (&y.0, &y.1)));
        let ids: Vec<_> = entries.iter().map(|(_, alert)| alert.callsign.as_str()).collect();
        assert_eq!(ids, vec!["CCC", "AAA", "BBB"]);
    }
}
