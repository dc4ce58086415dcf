//! REST API integration tests over the in-memory store.

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

mod common;
use common::{send, test_app};

fn router_element() -> Value {
    json!({
        "name": "core-router-1",
        "ip_address": "10.0.0.1",
        "type": "router",
        "location": "rack-a"
    })
}

/// The banner identifies the service.
#[tokio::test]
async fn test_root_banner() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Network Element Monitor API");
    assert_eq!(body["status"], "running");
}

/// Health reports the version and connected listeners.
#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
    assert_eq!(body["listeners"], 0);
}

/// A created element can be fetched back with server-assigned fields.
#[tokio::test]
async fn test_create_and_get_element() {
    let (app, _) = test_app();

    let (status, created) =
        send(&app, Method::POST, "/api/elements", Some(router_element())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["_id"], id.as_str());
    assert_eq!(created["data"]["status"], "active");
    assert!(created["data"]["created_at"].is_string());

    let (status, fetched) = send(&app, Method::GET, &format!("/api/elements/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);
}

/// Blank required fields are rejected with the structured error body.
#[tokio::test]
async fn test_create_element_rejects_blank_name() {
    let (app, _) = test_app();
    let mut element = router_element();
    element["name"] = json!("  ");

    let (status, body) = send(&app, Method::POST, "/api/elements", Some(element)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);
}

/// The status filter only returns matching elements.
#[tokio::test]
async fn test_list_elements_by_status() {
    let (app, _) = test_app();
    send(&app, Method::POST, "/api/elements", Some(router_element())).await;
    let mut down = router_element();
    down["name"] = json!("edge-switch-2");
    down["status"] = json!("down");
    send(&app, Method::POST, "/api/elements", Some(down)).await;

    let (status, all) = send(&app, Method::GET, "/api/elements", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["count"], 2);

    let (_, filtered) = send(&app, Method::GET, "/api/elements?status=down", None).await;
    assert_eq!(filtered["count"], 1);
    assert_eq!(filtered["data"][0]["name"], "edge-switch-2");
}

/// An empty status parameter is the same as no filter.
#[tokio::test]
async fn test_list_elements_with_empty_status() {
    let (app, _) = test_app();
    send(&app, Method::POST, "/api/elements", Some(router_element())).await;

    let (status, body) = send(&app, Method::GET, "/api/elements?status=", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

/// Updates touch only the fields present in the body.
#[tokio::test]
async fn test_update_element_is_partial() {
    let (app, _) = test_app();
    let (_, created) = send(&app, Method::POST, "/api/elements", Some(router_element())).await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/elements/{id}");

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"status": "maintenance"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Element updated");

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["data"]["status"], "maintenance");
    assert_eq!(fetched["data"]["name"], "core-router-1");
    assert_eq!(fetched["data"]["ip_address"], "10.0.0.1");
}

/// Unknown ids map to 404 for get, update and delete.
#[tokio::test]
async fn test_missing_element_is_not_found() {
    let (app, _) = test_app();
    let uri = format!("/api/elements/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"status": "down"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Malformed ids never reach the store.
#[tokio::test]
async fn test_malformed_element_id_is_bad_request() {
    let (app, _) = test_app();

    let (status, _) = send(&app, Method::GET, "/api/elements/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Deleting an element removes it.
#[tokio::test]
async fn test_delete_element() {
    let (app, _) = test_app();
    let (_, created) = send(&app, Method::POST, "/api/elements", Some(router_element())).await;
    let uri = format!("/api/elements/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Element deleted");

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Metrics come back newest first, limited, and scoped to the element.
#[tokio::test]
async fn test_metrics_newest_first_with_limit() {
    let (app, _) = test_app();
    for value in [10.0, 20.0, 30.0] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/metrics",
            Some(json!({
                "element_id": "el-1",
                "metric_type": "cpu",
                "value": value,
                "unit": "%"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    send(
        &app,
        Method::POST,
        "/api/metrics",
        Some(json!({"element_id": "el-2", "metric_type": "cpu", "value": 99.0, "unit": "%"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/metrics/el-1?limit=2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["value"], 30.0);
    assert_eq!(body["data"][1]["value"], 20.0);
}

/// An element with no samples yields an empty list.
#[tokio::test]
async fn test_metrics_for_unknown_element_is_empty() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/api/metrics/nothing-here", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

/// Resolving an alert moves it between the resolved filters.
#[tokio::test]
async fn test_alert_lifecycle() {
    let (app, _) = test_app();
    let (status, created) = send(
        &app,
        Method::POST,
        "/api/alerts",
        Some(json!({
            "element_id": "el-1",
            "severity": "critical",
            "message": "link down"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["resolved"], false);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, open) = send(&app, Method::GET, "/api/alerts?resolved=false", None).await;
    assert_eq!(open["count"], 1);

    let (status, body) = send(&app, Method::PUT, &format!("/api/alerts/{id}/resolve"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Alert resolved");

    let (_, open) = send(&app, Method::GET, "/api/alerts?resolved=false", None).await;
    assert_eq!(open["count"], 0);
    let (_, resolved) = send(&app, Method::GET, "/api/alerts?resolved=true", None).await;
    assert_eq!(resolved["count"], 1);
    assert!(resolved["data"][0]["resolved_at"].is_string());
}

/// Resolving an unknown alert is a 404 with the alert error code.
#[tokio::test]
async fn test_resolve_missing_alert() {
    let (app, _) = test_app();
    let uri = format!("/api/alerts/{}/resolve", uuid::Uuid::new_v4());

    let (status, body) = send(&app, Method::PUT, &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2002);
}
