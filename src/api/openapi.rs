//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::api::dto::MessageResponse;
use crate::api::handlers::{alerts, elements, metrics, system};
use crate::domain::{
    Alert, ElementPatch, Envelope, EventType, Metric, NetworkElement, NewAlert, NewElement,
    NewMetric,
};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Network Element Monitor API",
        description = "CRUD over network elements, metric samples and alerts. Creations are pushed to WebSocket listeners on `/ws`."
    ),
    paths(
        system::root_handler,
        system::health_handler,
        elements::create_element,
        elements::list_elements,
        elements::get_element,
        elements::update_element,
        elements::delete_element,
        metrics::create_metric,
        metrics::list_metrics,
        alerts::create_alert,
        alerts::list_alerts,
        alerts::resolve_alert,
    ),
    components(schemas(
        NetworkElement,
        Metric,
        Alert,
        NewElement,
        ElementPatch,
        NewMetric,
        NewAlert,
        Envelope,
        EventType,
        MessageResponse,
        ErrorResponse,
        ErrorBody,
        system::RootResponse,
        system::HealthResponse,
    )),
    tags(
        (name = "System", description = "Banner and health check"),
        (name = "Elements", description = "Network element inventory"),
        (name = "Metrics", description = "Metric samples per element"),
        (name = "Alerts", description = "Alert lifecycle"),
    )
)]
pub struct ApiDoc;
