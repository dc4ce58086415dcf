//! Live broadcast tests against a real listener socket.

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use netmon_gateway::domain::HubSettings;

mod common;
use common::{TestServer, spawn_server};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(server: &TestServer) -> Client {
    let (socket, _) = assert_ok!(connect_async(server.ws_url()).await);
    socket
}

/// Reads the next text frame as JSON, failing after one second.
async fn next_envelope(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(1), client.next())
            .await
            .unwrap_or_else(|_| panic!("no frame within a second"));
        let Some(Ok(message)) = frame else {
            panic!("socket ended before an envelope arrived");
        };
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Every connected listener receives the alert raised over REST.
#[tokio::test]
async fn test_alert_reaches_every_listener() {
    let server = spawn_server(HubSettings::default()).await;
    let mut a = connect(&server).await;
    let mut b = connect(&server).await;
    let mut c = connect(&server).await;
    server.wait_for_listeners(3).await;

    let response = assert_ok!(
        reqwest::Client::new()
            .post(server.http_url("/api/alerts"))
            .json(&json!({
                "element_id": "el-7",
                "severity": "warning",
                "message": "fan speed high"
            }))
            .send()
            .await
    );
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let created: Value = assert_ok!(response.json().await);

    for client in [&mut a, &mut b, &mut c] {
        let envelope = next_envelope(client).await;
        assert_eq!(envelope["type"], "alert_created");
        assert_eq!(envelope["data"]["_id"], created["id"]);
        assert_eq!(envelope["data"]["message"], "fan speed high");
    }
}

/// Text from one listener is relayed to all listeners, the sender included.
#[tokio::test]
async fn test_listener_text_is_relayed_to_all() {
    let server = spawn_server(HubSettings::default()).await;
    let mut a = connect(&server).await;
    let mut b = connect(&server).await;
    server.wait_for_listeners(2).await;

    assert_ok!(a.send(Message::text("ping")).await);

    for client in [&mut a, &mut b] {
        let envelope = next_envelope(client).await;
        assert_eq!(envelope["type"], "message");
        assert_eq!(envelope["data"], "ping");
    }
}

/// A listener that disconnects is removed and later broadcasts skip it.
#[tokio::test]
async fn test_disconnected_listener_is_unregistered() {
    let server = spawn_server(HubSettings::default()).await;
    let mut a = connect(&server).await;
    let mut b = connect(&server).await;
    server.wait_for_listeners(2).await;

    assert_ok!(b.close(None).await);
    server.wait_for_listeners(1).await;

    let response = assert_ok!(
        reqwest::Client::new()
            .post(server.http_url("/api/metrics"))
            .json(&json!({
                "element_id": "el-1",
                "metric_type": "latency",
                "value": 12.5,
                "unit": "ms"
            }))
            .send()
            .await
    );
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let envelope = next_envelope(&mut a).await;
    assert_eq!(envelope["type"], "metric_update");
    assert_eq!(envelope["data"]["value"], 12.5);
}

/// Closing all listeners sends each a close frame.
#[tokio::test]
async fn test_close_all_ends_connections() {
    let server = spawn_server(HubSettings::default()).await;
    let mut a = connect(&server).await;
    server.wait_for_listeners(1).await;

    assert_eq!(server.state.hub.close_all().await, 1);

    let frame = tokio::time::timeout(Duration::from_secs(1), a.next())
        .await
        .unwrap_or_else(|_| panic!("connection stayed open"));
    match frame {
        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {}
        Some(Ok(other)) => panic!("expected close, got {other:?}"),
    }
    server.wait_for_listeners(0).await;
}

/// Plain HTTP requests to the listener endpoint are not upgraded.
#[tokio::test]
async fn test_plain_get_on_ws_is_rejected() {
    let server = spawn_server(HubSettings::default()).await;

    let response = assert_ok!(reqwest::get(server.http_url("/ws")).await);

    assert!(response.status().is_client_error());
    assert_err!(response.error_for_status());
    assert!(server.state.hub.is_empty().await);
}

/// A listener that stops reading is dropped, its socket is closed, and the
/// other listeners keep receiving. Text it sends afterwards is not relayed.
#[tokio::test]
async fn test_stalled_listener_is_disconnected() {
    let server = spawn_server(HubSettings {
        send_timeout: Duration::from_millis(200),
        queue_capacity: 1,
    })
    .await;
    let healthy = connect(&server).await;
    let mut stalled = connect(&server).await;
    server.wait_for_listeners(2).await;

    // Drain the healthy listener continuously and keep its relayed texts.
    let (mut healthy_tx, mut healthy_rx) = healthy.split();
    let (texts_tx, mut texts) = mpsc::unbounded_channel::<Value>();
    tokio::spawn(async move {
        while let Some(Ok(message)) = healthy_rx.next().await {
            if let Message::Text(text) = message {
                let envelope: Value = serde_json::from_str(text.as_str()).unwrap();
                if envelope["type"] == "message" && texts_tx.send(envelope["data"].clone()).is_err() {
                    return;
                }
            }
        }
    });

    // Large alerts fill the stalled socket's buffers until its queue times out.
    let http = reqwest::Client::new();
    let big_message = "x".repeat(512 * 1024);
    let mut flooded = false;
    for _ in 0..400 {
        let response = assert_ok!(
            http.post(server.http_url("/api/alerts"))
                .json(&json!({
                    "element_id": "el-9",
                    "severity": "info",
                    "message": big_message
                }))
                .send()
                .await
        );
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        if server.state.hub.len().await == 1 {
            flooded = true;
            break;
        }
    }
    assert!(flooded, "stalled listener was never dropped");

    // The server tears the dropped connection down.
    let ended = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match stalled.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert_ok!(ended, "dropped listener's socket stayed open");

    let _ = stalled.send(Message::text("from-dropped")).await;
    assert_ok!(healthy_tx.send(Message::text("still-here")).await);

    let relayed = tokio::time::timeout(Duration::from_secs(2), texts.recv())
        .await
        .unwrap_or_else(|_| panic!("healthy listener received no relayed text"));
    assert_eq!(relayed, Some(Value::from("still-here")));
    assert_eq!(server.state.hub.len().await, 1);
}
