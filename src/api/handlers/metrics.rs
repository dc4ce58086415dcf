//! Metric handlers: record a sample, read an element's latest samples.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreatedResponse, ListResponse, MetricQuery};
use crate::app_state::AppState;
use crate::domain::NewMetric;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /api/metrics` — Record a metric sample.
///
/// # Errors
///
/// Returns [`GatewayError`] on blank required fields or store failure.
#[utoipa::path(
    post,
    path = "/api/metrics",
    tag = "Metrics",
    summary = "Record a metric sample",
    description = "Stores the sample with a server-assigned `timestamp` and broadcasts a `metric_update` envelope.",
    request_body = NewMetric,
    responses(
        (status = 201, description = "Metric recorded", body = serde_json::Value),
        (status = 400, description = "Invalid metric", body = ErrorResponse),
    )
)]
pub async fn create_metric(
    State(state): State<AppState>,
    Json(req): Json<NewMetric>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state.records.record_metric(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(record.id, record)),
    ))
}

/// `GET /api/metrics/{element_id}` — Latest samples of an element.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/metrics/{element_id}",
    tag = "Metrics",
    summary = "List an element's metrics",
    description = "Returns the newest samples first, at most `limit` (default 100, max 1000).",
    params(
        ("element_id" = String, Path, description = "Element the samples belong to"),
        MetricQuery,
    ),
    responses(
        (status = 200, description = "Metric samples", body = serde_json::Value),
    )
)]
pub async fn list_metrics(
    State(state): State<AppState>,
    Path(element_id): Path<String>,
    Query(query): Query<MetricQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let query = query.clamped();
    let metrics = state
        .records
        .metrics_for_element(&element_id, query.limit)
        .await?;
    Ok(Json(ListResponse::from(metrics)))
}

/// Metric routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", post(create_metric))
        .route("/metrics/{element_id}", get(list_metrics))
}
