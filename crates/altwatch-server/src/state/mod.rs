//! Application state shared by the API and background loops.
//!
//! Built once at startup and handed out by `Arc`; there are no globals.

pub mod snapshots;

use std::sync::Arc;

use altwatch_core::Zone;

use crate::alerts::{AlertStore, MemoryAlertStore, TimedAlertStore};
use crate::config::{Config, ConfigError};
use crate::loops::MonitorLoop;
use crate::monitor::AltitudeMonitor;
use crate::query::AlertQueryService;
use crate::zones::{LocalZones, ZoneOracle};

pub use snapshots::{SnapshotSource, SnapshotStore};

pub struct AppState {
    config: Config,
    snapshots: Arc<SnapshotStore>,
    zones: Arc<ZoneOracle>,
    monitor: Arc<AltitudeMonitor>,
    monitor_loop: MonitorLoop,
    query: AlertQueryService,
}

impl AppState {
    /// Wire the monitor, schedule and query service around the given collaborators.
    pub fn new(
        config: Config,
        store: Arc<dyn AlertStore>,
        zones: Arc<ZoneOracle>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = config.rules()?;

        let snapshots = Arc::new(SnapshotStore::new());
        let alerts = TimedAlertStore::new(store, config.store_timeout());
        let monitor = Arc::new(AltitudeMonitor::new(
            snapshots.clone(),
            zones.clone(),
            alerts.clone(),
            rules,
            config.containment_concurrency,
        ));
        let monitor_loop = MonitorLoop::new(monitor.clone(), config.check_interval());
        let query = AlertQueryService::new(snapshots.clone(), zones.clone(), alerts, rules);

        Ok(Self {
            config,
            snapshots,
            zones,
            monitor,
            monitor_loop,
            query,
        })
    }

    /// In-memory alert store and local zones only.
    pub fn in_memory(config: Config, zones: Vec<Zone>) -> Result<Self, ConfigError> {
        let store = Arc::new(MemoryAlertStore::new(
            config.alert_ttl(),
            config.active_alert_cap,
        ));
        let oracle = Arc::new(ZoneOracle::local(
            Arc::new(LocalZones::new(zones)),
            config.zone_query_timeout(),
        ));
        Self::new(config, store, oracle)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshots(&self) -> &Arc<SnapshotStore> {
        &self.snapshots
    }

    pub fn zones(&self) -> &Arc<ZoneOracle> {
        &self.zones
    }

    pub fn monitor(&self) -> &Arc<AltitudeMonitor> {
        &self.monitor
    }

    pub fn monitor_loop(&self) -> &MonitorLoop {
        &self.monitor_loop
    }

    pub fn query(&self) -> &AlertQueryService {
        &self.query
    }
}
