//! netmon-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use netmon_gateway::app_state::AppState;
use netmon_gateway::config::{GatewayConfig, LogFormat};
use netmon_gateway::domain::{Hub, InboundRelay};
use netmon_gateway::persistence::{MemoryStore, PostgresStore, RecordStore};
use netmon_gateway::server;
use netmon_gateway::service::RecordService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting netmon-gateway");

    // Build persistence layer
    let store = if config.persistence_enabled {
        let postgres = PostgresStore::connect(&config)
            .await
            .context("failed to connect to PostgreSQL")?;
        RecordStore::from(postgres)
    } else {
        tracing::warn!("persistence disabled, records are kept in memory");
        RecordStore::from(MemoryStore::new())
    };
    tracing::info!(backend = store.backend(), "record store ready");

    // Build broadcast layer
    let hub = Hub::new(config.hub_settings());
    let (inbound, relay) = InboundRelay::channel(config.inbound_queue_capacity);
    tokio::spawn(relay.run(hub.clone()));

    // Build service layer and application state
    let records = Arc::new(RecordService::new(store, hub.clone()));
    let app_state = AppState {
        records,
        hub: hub.clone(),
        inbound,
    };

    let app = server::build_app(app_state, config.request_timeout());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal(hub))
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}
