//! Integration tests for the HTTP/SSE transport
//!
//! Requests go straight into the router with `oneshot`, no socket needed.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use gnosis_core::api::{ApiServer, ApiServerConfig};
use gnosis_core::CulturalPathologist;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tower::ServiceExt;

fn create_test_router() -> Router {
    ApiServer::new(
        ApiServerConfig::default(),
        Arc::new(CulturalPathologist::new()),
    )
    .router()
}

async fn get_json(router: &Router, uri: &str) -> Value {
    let response = router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_message(router: &Router, session_id: &str, body: Value) -> StatusCode {
    router
        .clone()
        .oneshot(
            Request::post(format!("/messages?sessionId={}", session_id))
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

/// Reads SSE frames off a response body
struct EventReader {
    stream: axum::body::BodyDataStream,
    buffer: String,
}

impl EventReader {
    fn new(body: Body) -> Self {
        Self {
            stream: body.into_data_stream(),
            buffer: String::new(),
        }
    }

    /// Next non-comment event as (event name, data)
    async fn next_event(&mut self) -> (String, String) {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let frame: String = self.buffer.drain(..end + 2).collect();
                let mut event = String::from("message");
                let mut data = Vec::new();
                for line in frame.lines() {
                    if let Some(name) = line.strip_prefix("event:") {
                        event = name.trim().to_string();
                    } else if let Some(chunk) = line.strip_prefix("data:") {
                        data.push(chunk.trim_start().to_string());
                    }
                }
                if data.is_empty() {
                    continue;
                }
                return (event, data.join("\n"));
            }

            let chunk = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("timed out waiting for SSE event")
                .expect("SSE stream ended")
                .unwrap();
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }
}

async fn open_session(router: &Router) -> (EventReader, String) {
    let response = router
        .clone()
        .oneshot(Request::get("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut reader = EventReader::new(response.into_body());
    let (event, data) = reader.next_event().await;
    assert_eq!(event, "endpoint");
    let session_id = data
        .strip_prefix("/messages?sessionId=")
        .expect("endpoint event should name the message URL")
        .to_string();
    (reader, session_id)
}

#[tokio::test]
async fn test_health() {
    let router = create_test_router();
    let health = get_json(&router, "/health").await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["name"], "gnosis");
    assert_eq!(health["active_sessions"], 0);
}

#[tokio::test]
async fn test_info_lists_layers_and_tools() {
    let router = create_test_router();
    let info = get_json(&router, "/info").await;
    assert_eq!(info["total_diagnosticators"], 8);
    assert_eq!(info["tools"].as_array().unwrap().len(), 4);

    let layers = info["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0]["name"], "Cultural Diagnosis");
    assert_eq!(layers[1]["diagnosticators"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_post_to_unknown_session() {
    let router = create_test_router();
    let status = post_message(
        &router,
        "00000000-0000-0000-0000-000000000000",
        json!({"jsonrpc": "2.0", "method": "ping", "id": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let status = post_message(&router, "not-a-uuid", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sse_session_round_trip() {
    let router = create_test_router();
    let (mut reader, session_id) = open_session(&router).await;

    let status = post_message(
        &router,
        &session_id,
        json!({"jsonrpc": "2.0", "method": "initialize", "params": {}, "id": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (event, data) = reader.next_event().await;
    assert_eq!(event, "message");
    let response: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["serverInfo"]["name"], "gnosis");

    // Notifications are accepted without a reply
    let status = post_message(
        &router,
        &session_id,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let status = post_message(
        &router,
        &session_id,
        json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "gnosis", "arguments": {"tag": "begin", "content": "a", "stepNumber": 1}},
            "id": 2
        }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (_, data) = reader.next_event().await;
    let response: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(response["id"], 2);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("GNOSIS_FRAMEWORK_ACTIVATED"));
}

#[tokio::test]
async fn test_sessions_keep_separate_journals() {
    let router = create_test_router();
    let (mut first, first_id) = open_session(&router).await;
    let (mut second, second_id) = open_session(&router).await;
    assert_ne!(first_id, second_id);

    post_message(
        &router,
        &first_id,
        json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "gnosis", "arguments": {"tag": "begin", "content": "a", "stepNumber": 1}},
            "id": 1
        }),
    )
    .await;
    first.next_event().await;

    let summary = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": {"name": "gnosis_journey", "arguments": {"action": "summary"}},
        "id": 2
    });

    post_message(&router, &first_id, summary.clone()).await;
    post_message(&router, &second_id, summary).await;

    let steps = |data: String| -> Value {
        let response: Value = serde_json::from_str(&data).unwrap();
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        serde_json::from_str::<Value>(text).unwrap()["summary"]["steps"].clone()
    };
    assert_eq!(steps(first.next_event().await.1), json!(1));
    assert_eq!(steps(second.next_event().await.1), json!(0));

    let health = get_json(&router, "/health").await;
    assert_eq!(health["active_sessions"], 2);
}

#[tokio::test]
async fn test_parse_error_is_delivered_on_stream() {
    let router = create_test_router();
    let (mut reader, session_id) = open_session(&router).await;

    let status = router
        .clone()
        .oneshot(
            Request::post(format!("/messages?sessionId={}", session_id))
                .body(Body::from("{broken"))
                .unwrap(),
        )
        .await
        .unwrap()
        .status();
    assert_eq!(status, StatusCode::ACCEPTED);

    let (_, data) = reader.next_event().await;
    let response: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(response["error"]["code"], -32700);
    assert!(response["id"].is_null());
}

#[tokio::test]
async fn test_stats_count_tool_calls() {
    let router = create_test_router();
    let (mut reader, session_id) = open_session(&router).await;

    for (id, args) in [
        (1, json!({"mode": "layer_diagnosis", "layer": 2, "description": "burnout"})),
        (2, json!({"mode": "full_diagnosis", "description": "burnout"})),
        (3, json!({"mode": "full_diagnosis", "layer": 3, "description": "burnout"})),
    ] {
        post_message(
            &router,
            &session_id,
            json!({
                "jsonrpc": "2.0",
                "method": "tools/call",
                "params": {"name": "cultural_pathology_analysis", "arguments": args},
                "id": id
            }),
        )
        .await;
        reader.next_event().await;
    }

    let stats = get_json(&router, "/stats").await;
    assert_eq!(stats["total_sessions"], 1);
    assert_eq!(stats["total_operations"], 3);
    assert_eq!(stats["operations_by_tool"]["cultural_pathology_analysis"], 3);
    assert_eq!(stats["diagnostics_by_layer"]["layer2"], 1);
    assert!(stats["diagnostics_by_layer"].get("layer3").is_none());
}

#[tokio::test]
async fn test_dropped_stream_closes_session() {
    let router = create_test_router();
    let (reader, session_id) = open_session(&router).await;
    assert_eq!(get_json(&router, "/health").await["active_sessions"], 1);

    drop(reader);

    let mut closed = false;
    for _ in 0..50 {
        if get_json(&router, "/health").await["active_sessions"] == 0 {
            closed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(closed, "session should be removed once its stream is dropped");

    let status = post_message(
        &router,
        &session_id,
        json!({"jsonrpc": "2.0", "method": "ping", "id": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
