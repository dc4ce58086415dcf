//! Test utilities and common setup.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use netmon_gateway::app_state::AppState;
use netmon_gateway::domain::{Hub, HubSettings, InboundRelay};
use netmon_gateway::persistence::{MemoryStore, RecordStore};
use netmon_gateway::server;
use netmon_gateway::service::RecordService;

/// Application state over an in-memory store, with the inbound relay
/// running.
pub fn test_state(settings: HubSettings) -> AppState {
    let hub = Hub::new(settings);
    let (inbound, relay) = InboundRelay::channel(64);
    tokio::spawn(relay.run(hub.clone()));
    let records = Arc::new(RecordService::new(
        RecordStore::from(MemoryStore::new()),
        hub.clone(),
    ));
    AppState {
        records,
        hub,
        inbound,
    }
}

/// Router over a fresh in-memory state.
pub fn test_app() -> (Router, AppState) {
    let state = test_state(HubSettings::default());
    let app = server::build_app(state.clone(), Duration::from_secs(5));
    (app, state)
}

/// Sends one request through `app` and returns status and JSON body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// A server bound to an ephemeral local port.
#[derive(Debug)]
pub struct TestServer {
    /// Bound address.
    pub addr: SocketAddr,
    /// State shared with the running server.
    pub state: AppState,
}

impl TestServer {
    /// Base URL for HTTP requests.
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// URL of the listener endpoint.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Waits until the hub holds exactly `count` listeners.
    pub async fn wait_for_listeners(&self, count: usize) {
        for _ in 0..200 {
            if self.state.hub.len().await == count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {count} listeners, hub has {}",
            self.state.hub.len().await
        );
    }
}

/// Starts the full application on `127.0.0.1:0`.
pub async fn spawn_server(settings: HubSettings) -> TestServer {
    let state = test_state(settings);
    let app = server::build_app(state.clone(), Duration::from_secs(5));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer { addr, state }
}
