//! Recurring low-altitude check schedule.
//!
//! `start` runs a check immediately and then every interval. Calling `start`
//! while running cancels the current schedule and starts a fresh one (with
//! its own immediate check). `stop` cancels the schedule but lets an
//! in-flight cycle finish.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::monitor::AltitudeMonitor;

enum LoopState {
    Stopped,
    Running {
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<()>,
    },
}

pub struct MonitorLoop {
    monitor: Arc<AltitudeMonitor>,
    period: Duration,
    state: Mutex<LoopState>,
}

impl MonitorLoop {
    pub fn new(monitor: Arc<AltitudeMonitor>, period: Duration) -> Self {
        Self {
            monitor,
            period,
            state: Mutex::new(LoopState::Stopped),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Schedule checks. Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let LoopState::Running { shutdown, .. } =
            std::mem::replace(&mut *state, LoopState::Stopped)
        {
            let _ = shutdown.send(());
            tracing::info!("Restarting altitude monitoring");
        }

        let (shutdown, rx) = oneshot::channel();
        let task = tokio::spawn(run_altitude_loop(self.monitor.clone(), self.period, rx));
        *state = LoopState::Running { shutdown, task };

        tracing::info!(
            "Starting altitude monitoring (check every {}s)",
            self.period.as_secs_f64()
        );
    }

    /// Cancel the schedule. Returns false if it was not running.
    pub fn stop(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match std::mem::replace(&mut *state, LoopState::Stopped) {
            LoopState::Running { shutdown, .. } => {
                let _ = shutdown.send(());
                tracing::info!("Altitude monitoring stopped");
                true
            }
            LoopState::Stopped => false,
        }
    }

    pub fn is_running(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        matches!(&*state, LoopState::Running { task, .. } if !task.is_finished())
    }
}

/// Drive `monitor.check()` every `period` until `shutdown` fires or its sender is dropped.
pub async fn run_altitude_loop(
    monitor: Arc<AltitudeMonitor>,
    period: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // Shutdown wins over a tick that became ready during a slow cycle.
            biased;
            _ = &mut shutdown => {
                tracing::debug!("Altitude loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                monitor.check().await;
            }
        }
    }
}
