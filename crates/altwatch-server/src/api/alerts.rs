//! Alert read endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use altwatch_core::{Alert, AltitudeStatus};

use crate::api::error::{ok, ApiError, ApiResponse, ApiResult};
use crate::query::DEFAULT_HISTORY_LIMIT;
use crate::state::AppState;

/// Upper bound on a single history request.
const MAX_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn active_alerts(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<Alert>>>> {
    Ok(ok(state.query().active_alerts().await?))
}

pub async fn alert_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Alert>>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    Ok(ok(state.query().alert_history(limit).await?))
}

pub async fn altitude_status(
    State(state): State<Arc<AppState>>,
    Path(callsign): Path<String>,
) -> ApiResult<Json<ApiResponse<AltitudeStatus>>> {
    state
        .query()
        .aircraft_altitude_status(&callsign)
        .await?
        .map(ok)
        .ok_or_else(|| ApiError::NotFound(format!("Aircraft {} not found", callsign)))
}
