//! System endpoints: service banner and health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Service banner.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    message: &'static str,
    status: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    listeners: usize,
}

/// `GET /` — Service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Service banner",
    responses(
        (status = 200, description = "Service is running", body = RootResponse),
    )
)]
pub async fn root_handler() -> impl IntoResponse {
    Json(RootResponse {
        message: "Network Element Monitor API",
        status: "running",
    })
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp and the number of connected WebSocket listeners.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            listeners: state.hub.len().await,
        }),
    )
}

/// System routes mounted at the root level (not under /api).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}
