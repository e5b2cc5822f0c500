//! Position report ingestion and snapshot listing.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use altwatch_core::AircraftSnapshot;

use crate::api::error::{ok, ApiError, ApiResponse, ApiResult};
use crate::state::{AppState, SnapshotSource};

/// One snapshot or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PositionReport {
    Batch(Vec<AircraftSnapshot>),
    Single(AircraftSnapshot),
}

impl PositionReport {
    fn into_snapshots(self) -> Vec<AircraftSnapshot> {
        match self {
            PositionReport::Batch(snapshots) => snapshots,
            PositionReport::Single(snapshot) => vec![snapshot],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub accepted: usize,
}

pub async fn ingest_positions(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PositionReport>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<IngestResponse>>)> {
    let Json(report) = payload?;
    let snapshots = report.into_snapshots();
    for snapshot in &snapshots {
        validate_snapshot(snapshot)?;
    }

    let accepted = snapshots.len();
    for mut snapshot in snapshots {
        snapshot.callsign = snapshot.callsign.trim().to_string();
        state.snapshots().upsert(snapshot);
    }
    tracing::debug!("Accepted {} position report(s)", accepted);

    Ok((StatusCode::ACCEPTED, ok(IngestResponse { accepted })))
}

pub async fn list_aircraft(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<AircraftSnapshot>>>> {
    let mut aircraft = state.snapshots().list_all().await?;
    aircraft.sort_by(|a, b| a.callsign.cmp(&b.callsign));
    Ok(ok(aircraft))
}

fn validate_snapshot(snapshot: &AircraftSnapshot) -> Result<(), ApiError> {
    if snapshot.callsign.trim().is_empty() {
        return Err(ApiError::BadRequest("callsign is required".to_string()));
    }
    if snapshot.position().is_none() {
        return Err(ApiError::BadRequest(format!(
            "invalid position for {}: ({}, {})",
            snapshot.callsign, snapshot.latitude, snapshot.longitude
        )));
    }
    if let Some(altitude) = snapshot.altitude_ft {
        if !altitude.is_finite() {
            return Err(ApiError::BadRequest(format!(
                "invalid altitude for {}",
                snapshot.callsign
            )));
        }
    }
    Ok(())
}
