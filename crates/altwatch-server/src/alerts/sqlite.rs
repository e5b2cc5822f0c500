//! SQLite-backed alert store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use altwatch_core::Alert;

use super::AlertStore;
use crate::error::StoreError;
use crate::persistence::{alerts as alerts_db, Database};

pub struct SqliteAlertStore {
    db: Database,
    ttl: Duration,
    cap: usize,
}

impl SqliteAlertStore {
    pub fn new(db: Database, ttl: Duration, cap: usize) -> Self {
        Self { db, ttl, cap }
    }
}

#[async_trait]
impl AlertStore for SqliteAlertStore {
    async fn put(&self, alert: &Alert) -> Result<(), StoreError> {
        let now_ms = Utc::now().timestamp_millis();
        let expires_at_ms = now_ms.saturating_add(self.ttl.as_millis() as i64);
        alerts_db::insert_alert(self.db.pool(), alert, now_ms, expires_at_ms, self.cap).await
    }

    async fn list_active(&self) -> Result<Vec<Alert>, StoreError> {
        let payloads = alerts_db::load_active_payloads(self.db.pool()).await?;
        Ok(payloads
            .iter()
            .filter_map(|payload| decode(None, payload))
            .collect())
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<Alert>, StoreError> {
        let now_ms = Utc::now().timestamp_millis();
        let rows = alerts_db::load_history_payloads(self.db.pool(), now_ms, limit).await?;
        Ok(rows
            .iter()
            .filter_map(|(key, payload)| decode(Some(key), payload))
            .collect())
    }
}

fn decode(key: Option<&str>, payload: &str) -> Option<Alert> {
    match serde_json::from_str::<Alert>(payload) {
        Ok(alert) => Some(alert),
        Err(err) => {
            tracing::warn!("Skipping undecodable alert {}: {}", key.unwrap_or("(active list)"), err);
            None
        }
    }
}
