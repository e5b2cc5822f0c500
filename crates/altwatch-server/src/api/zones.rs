//! Zone endpoints.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use altwatch_core::{ContainmentSource, Position, Zone, ZoneMatch};

use crate::api::error::{ok, ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

/// Locally held zone list.
pub async fn list_zones(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<Zone>>> {
    ok(state.zones().fallback_zones().list())
}

#[derive(Debug, Deserialize)]
pub struct PointCheckQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct PointCheckResponse {
    pub inside_zone: bool,
    pub zone: Option<ZoneMatch>,
    pub source: ContainmentSource,
}

pub async fn check_point(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointCheckQuery>,
) -> ApiResult<Json<ApiResponse<PointCheckResponse>>> {
    if !Position::new(query.lat, query.lon).is_valid() {
        return Err(ApiError::BadRequest(format!(
            "invalid position ({}, {})",
            query.lat, query.lon
        )));
    }
    let containment = state.zones().contains(query.lat, query.lon).await;
    Ok(ok(PointCheckResponse {
        inside_zone: containment.inside(),
        zone: containment.matched,
        source: containment.source,
    }))
}
