//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{aircraft, alerts, monitor, request_id, zones};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    let alert_routes = Router::new()
        .route("/v1/alerts/active", get(alerts::active_alerts))
        .route("/v1/alerts/history", get(alerts::alert_history))
        .route(
            "/v1/aircraft/:callsign/altitude-status",
            get(alerts::altitude_status),
        );

    let aircraft_routes = Router::new()
        .route("/v1/aircraft", get(aircraft::list_aircraft))
        .route("/v1/aircraft/positions", post(aircraft::ingest_positions));

    let zone_routes = Router::new()
        .route("/v1/zones", get(zones::list_zones))
        .route("/v1/zones/check", get(zones::check_point));

    let monitor_routes = Router::new()
        .route("/v1/monitor", get(monitor::monitor_status))
        .route("/v1/monitor/check", post(monitor::run_check));

    alert_routes
        .merge(aircraft_routes)
        .merge(zone_routes)
        .merge(monitor_routes)
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
