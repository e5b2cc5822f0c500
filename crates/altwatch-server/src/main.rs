//! Altwatch server: low-altitude hazard monitor with REST API.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use altwatch_server::alerts::{AlertStore, MemoryAlertStore, SqliteAlertStore};
use altwatch_server::api;
use altwatch_server::config::{Config, LogFormat};
use altwatch_server::loops::zone_refresh_loop::run_zone_refresh_loop;
use altwatch_server::persistence::init_database;
use altwatch_server::state::AppState;
use altwatch_server::zones::{local::load_zones_file, HttpZoneQuery, LocalZones, ZoneOracle};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(&config.log_format)?;

    tracing::info!("Starting altwatch server...");
    config.validate()?;

    let zones_path = Path::new(&config.zones_path);
    let zones = load_zones_file(zones_path)
        .await
        .with_context(|| format!("failed to load zones from {}", config.zones_path))?;
    tracing::info!("Loaded {} airport zones from {}", zones.len(), config.zones_path);
    let local_zones = Arc::new(LocalZones::new(zones));

    let store: Arc<dyn AlertStore> = match &config.database_path {
        Some(path) => {
            let db = init_database(path, config.database_max_connections)
                .await
                .context("failed to open alert database")?;
            Arc::new(SqliteAlertStore::new(
                db,
                config.alert_ttl(),
                config.active_alert_cap,
            ))
        }
        None => {
            tracing::info!("ALERT_DB_PATH not set; alerts are kept in memory");
            Arc::new(MemoryAlertStore::new(
                config.alert_ttl(),
                config.active_alert_cap,
            ))
        }
    };

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let oracle = match &config.zone_service_url {
        Some(url) => {
            let remote = Arc::new(HttpZoneQuery::new(url.clone(), config.zone_query_timeout())?);
            tracing::info!("Zone containment via {} (local fallback)", url);
            tokio::spawn(run_zone_refresh_loop(
                remote.clone(),
                local_zones.clone(),
                std::time::Duration::from_secs(config.zone_refresh_secs),
                shutdown_tx.subscribe(),
            ));
            ZoneOracle::new(remote, local_zones, config.zone_query_timeout())
        }
        None => ZoneOracle::local(local_zones, config.zone_query_timeout()),
    };

    let port = config.server_port;
    let state = Arc::new(AppState::new(config, store, Arc::new(oracle))?);
    state.monitor_loop().start();

    let app = api::routes()
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.monitor_loop().stop();
    let _ = shutdown_tx.send(());
    tracing::info!("Altwatch server stopped");

    Ok(())
}

fn init_tracing(format: &LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("altwatch_server=debug".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
