//! Monitor status and on-demand checks.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use altwatch_core::Alert;

use crate::api::error::{ok, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MonitorStatus {
    pub running: bool,
    pub min_safe_altitude_ft: f64,
    pub check_interval_secs: f64,
    pub tracked_aircraft: usize,
}

pub async fn monitor_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<MonitorStatus>> {
    ok(MonitorStatus {
        running: state.monitor_loop().is_running(),
        min_safe_altitude_ft: state.monitor().rules().min_safe_altitude_ft,
        check_interval_secs: state.monitor_loop().period().as_secs_f64(),
        tracked_aircraft: state.snapshots().len(),
    })
}

/// Run one cycle now. Waits for any in-flight scheduled cycle first.
pub async fn run_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<Alert>>> {
    ok(state.monitor().check().await)
}
