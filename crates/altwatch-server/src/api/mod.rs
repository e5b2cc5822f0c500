//! API routes for the altitude monitor.

pub mod aircraft;
pub mod alerts;
pub mod error;
pub mod monitor;
pub mod request_id;
mod routes;
pub mod zones;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
