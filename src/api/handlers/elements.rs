//! Network element CRUD handlers: create, list, get, update, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreatedResponse, ElementQuery, ItemResponse, ListResponse, MessageResponse};
use crate::app_state::AppState;
use crate::domain::{ElementPatch, NewElement, RecordId};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /api/elements` — Register a network element.
///
/// # Errors
///
/// Returns [`GatewayError`] on blank required fields or store failure.
#[utoipa::path(
    post,
    path = "/api/elements",
    tag = "Elements",
    summary = "Create a network element",
    description = "Stores the element with a server-assigned `created_at` and broadcasts an `element_created` envelope to every WebSocket listener.",
    request_body = NewElement,
    responses(
        (status = 201, description = "Element created", body = serde_json::Value),
        (status = 400, description = "Invalid element", body = ErrorResponse),
    )
)]
pub async fn create_element(
    State(state): State<AppState>,
    Json(req): Json<NewElement>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state.records.create_element(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(record.id, record)),
    ))
}

/// `GET /api/elements` — List elements, optionally by status.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/elements",
    tag = "Elements",
    summary = "List network elements",
    params(ElementQuery),
    responses(
        (status = 200, description = "Element list", body = serde_json::Value),
    )
)]
pub async fn list_elements(
    State(state): State<AppState>,
    Query(query): Query<ElementQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let elements = state.records.list_elements(query.status.as_deref()).await?;
    Ok(Json(ListResponse::from(elements)))
}

/// `GET /api/elements/{id}` — Get one element.
///
/// # Errors
///
/// Returns [`GatewayError::ElementNotFound`] if the element does not exist.
#[utoipa::path(
    get,
    path = "/api/elements/{id}",
    tag = "Elements",
    summary = "Get a network element",
    params(
        ("id" = uuid::Uuid, Path, description = "Element ID"),
    ),
    responses(
        (status = 200, description = "Element", body = serde_json::Value),
        (status = 404, description = "Element not found", body = ErrorResponse),
    )
)]
pub async fn get_element(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state.records.get_element(RecordId::from_uuid(id)).await?;
    Ok(Json(ItemResponse::new(record)))
}

/// `PUT /api/elements/{id}` — Update the fields present in the body.
///
/// # Errors
///
/// Returns [`GatewayError::ElementNotFound`] if the element does not exist.
#[utoipa::path(
    put,
    path = "/api/elements/{id}",
    tag = "Elements",
    summary = "Update a network element",
    description = "Sets every field present in the body; absent fields keep their value.",
    params(
        ("id" = uuid::Uuid, Path, description = "Element ID"),
    ),
    request_body = ElementPatch,
    responses(
        (status = 200, description = "Element updated", body = MessageResponse),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Element not found", body = ErrorResponse),
    )
)]
pub async fn update_element(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(patch): Json<ElementPatch>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .records
        .update_element(RecordId::from_uuid(id), &patch)
        .await?;
    Ok(Json(MessageResponse::ok("Element updated")))
}

/// `DELETE /api/elements/{id}` — Delete an element.
///
/// # Errors
///
/// Returns [`GatewayError::ElementNotFound`] if the element does not exist.
#[utoipa::path(
    delete,
    path = "/api/elements/{id}",
    tag = "Elements",
    summary = "Delete a network element",
    params(
        ("id" = uuid::Uuid, Path, description = "Element ID"),
    ),
    responses(
        (status = 200, description = "Element deleted", body = MessageResponse),
        (status = 404, description = "Element not found", body = ErrorResponse),
    )
)]
pub async fn delete_element(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state.records.delete_element(RecordId::from_uuid(id)).await?;
    Ok(Json(MessageResponse::ok("Element deleted")))
}

/// Element routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/elements", post(create_element).get(list_elements))
        .route(
            "/elements/{id}",
            get(get_element).put(update_element).delete(delete_element),
        )
}
