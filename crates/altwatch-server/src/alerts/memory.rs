//! In-process alert store with per-key expiry and a capped active ring.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use altwatch_core::Alert;

use super::{history_order, AlertStore};
use crate::error::StoreError;

#[derive(Debug, Clone)]
struct StoredAlert {
    alert: Alert,
    expires_at: Instant,
}

pub struct MemoryAlertStore {
    alerts: DashMap<String, StoredAlert>,
    active: Mutex<VecDeque<Alert>>,
    ttl: Duration,
    cap: usize,
}

impl MemoryAlertStore {
    pub fn new(ttl: Duration, cap: usize) -> Self {
        Self {
            alerts: DashMap::new(),
            active: Mutex::new(VecDeque::with_capacity(cap)),
            ttl,
            cap,
        }
    }

    fn purge_expired(&self, now: Instant) {
        self.alerts.retain(|_, stored| stored.expires_at > now);
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn put(&self, alert: &Alert) -> Result<(), StoreError> {
        let now = Instant::now();
        self.purge_expired(now);
        self.alerts.insert(
            alert.store_key(),
            StoredAlert {
                alert: alert.clone(),
                expires_at: now + self.ttl,
            },
        );

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.push_front(alert.clone());
        active.truncate(self.cap);
        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<Alert>, StoreError> {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        Ok(active.iter().cloned().collect())
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<Alert>, StoreError> {
        let now = Instant::now();
        let mut entries: Vec<(String, Alert)> = self
            .alerts
            .iter()
            .filter(|entry| entry.value().expires_at > now)
            .map(|entry| (entry.key().clone(), entry.value().alert.clone()))
            .collect();

        entries.sort_by(|a, b| history_order((&a.0, &a.1), (&b.0, &b.1)));
        entries.truncate(limit);
        Ok(entries.into_iter().map(|(_, alert)| alert).collect())
    }
}
