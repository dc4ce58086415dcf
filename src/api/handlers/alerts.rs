//! Alert handlers: raise, list, resolve.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{post, put};
use axum::{Json, Router};

use crate::api::dto::{AlertQuery, CreatedResponse, ListResponse, MessageResponse};
use crate::app_state::AppState;
use crate::domain::{NewAlert, RecordId};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /api/alerts` — Raise an alert.
///
/// # Errors
///
/// Returns [`GatewayError`] on blank required fields or store failure.
#[utoipa::path(
    post,
    path = "/api/alerts",
    tag = "Alerts",
    summary = "Raise an alert",
    description = "Stores the alert with a server-assigned `created_at` and broadcasts an `alert_created` envelope.",
    request_body = NewAlert,
    responses(
        (status = 201, description = "Alert raised", body = serde_json::Value),
        (status = 400, description = "Invalid alert", body = ErrorResponse),
    )
)]
pub async fn create_alert(
    State(state): State<AppState>,
    Json(req): Json<NewAlert>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state.records.raise_alert(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(record.id, record)),
    ))
}

/// `GET /api/alerts` — List alerts, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Alerts",
    summary = "List alerts",
    params(AlertQuery),
    responses(
        (status = 200, description = "Alert list", body = serde_json::Value),
    )
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let alerts = state.records.list_alerts(query.resolved).await?;
    Ok(Json(ListResponse::from(alerts)))
}

/// `PUT /api/alerts/{id}/resolve` — Mark an alert resolved.
///
/// # Errors
///
/// Returns [`GatewayError::AlertNotFound`] if the alert does not exist.
#[utoipa::path(
    put,
    path = "/api/alerts/{id}/resolve",
    tag = "Alerts",
    summary = "Resolve an alert",
    params(
        ("id" = uuid::Uuid, Path, description = "Alert ID"),
    ),
    responses(
        (status = 200, description = "Alert resolved", body = MessageResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    )
)]
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state.records.resolve_alert(RecordId::from_uuid(id)).await?;
    Ok(Json(MessageResponse::ok("Alert resolved")))
}

/// Alert routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", post(create_alert).get(list_alerts))
        .route("/alerts/{id}/resolve", put(resolve_alert))
}
