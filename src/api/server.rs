//! HTTP server with SSE transport for MCP
//!
//! A client opens `GET /sse`, receives an `endpoint` event naming its
//! message URL, then POSTs JSON-RPC requests to `/messages?sessionId=..`.
//! Responses arrive as `message` events on the open stream.

use super::sessions::{SessionManager, ServerStats};
use crate::config::HttpConfig;
use crate::mcp::server::{encode, tool_call_params};
use crate::mcp::tools::{self, CULTURAL_PATHOLOGY};
use crate::mcp::JsonRpcRequest;
use crate::ontology;
use crate::pathology::{group_name, CulturalPathologist};
use crate::types::{Fallacy, MaterialityGenus};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event as SseEvent, KeepAlive},
        IntoResponse, Sse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::{wrappers::ReceiverStream, StreamExt as _};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
    /// Interval between SSE keep-alive comments
    pub keepalive: Duration,
    /// Pending responses buffered per session
    pub session_capacity: usize,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        HttpConfig::default().into()
    }
}

impl From<HttpConfig> for ApiServerConfig {
    fn from(http: HttpConfig) -> Self {
        Self {
            addr: http.addr,
            keepalive: http.keepalive,
            session_capacity: http.session_capacity,
        }
    }
}

/// API server state
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<SessionManager>,
    keepalive: Duration,
}

impl AppState {
    pub fn new(pathologist: Arc<CulturalPathologist>, config: &ApiServerConfig) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(pathologist, config.session_capacity)),
            keepalive: config.keepalive,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, pathologist: Arc<CulturalPathologist>) -> Self {
        let state = AppState::new(pathologist, &config);
        Self { config, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve until the process exits
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", self.config.addr, e))?;

        info!("GNOSIS HTTP server listening on http://{}", self.config.addr);
        info!("SSE endpoint: http://{}/sse", self.config.addr);

        axum::serve(listener, router).await?;
        Ok(())
    }
}

/// Build router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // MCP transport
        .route("/sse", get(sse_handler))
        .route("/messages", post(message_handler))
        // Introspection
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// SSE stream for one MCP session
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let (session, guard, rx) = state.sessions.open().await;

    let endpoint = tokio_stream::once(Ok(SseEvent::default()
        .event("endpoint")
        .data(format!("/messages?sessionId={}", session.id))));

    // The guard lives in the closure, so dropping the stream closes the session
    let messages = ReceiverStream::new(rx).map(move |response| {
        let _ = &guard;
        Ok::<_, Infallible>(SseEvent::default().event("message").data(encode(&response)))
    });

    Sse::new(endpoint.chain(messages))
        .keep_alive(KeepAlive::new().interval(state.keepalive))
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Accept one JSON-RPC message for a session
async fn message_handler(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> impl IntoResponse {
    let Some(raw_id) = query.session_id else {
        return error_response(StatusCode::BAD_REQUEST, "missing sessionId");
    };
    let Ok(session_id) = raw_id.parse::<Uuid>() else {
        return error_response(StatusCode::NOT_FOUND, "session not found");
    };
    let Some(session) = state.sessions.get(&session_id).await else {
        return error_response(StatusCode::NOT_FOUND, "session not found");
    };

    let response = match serde_json::from_str::<JsonRpcRequest>(&body) {
        Ok(request) => {
            if request.method == "tools/call" {
                if let Some((tool, args)) = tool_call_params(&request.params) {
                    let layer = if tool == CULTURAL_PATHOLOGY
                        && args.get("mode").and_then(Value::as_str) == Some("layer_diagnosis")
                    {
                        args.get("layer").and_then(Value::as_u64)
                    } else {
                        None
                    };
                    state.sessions.record_tool_call(&tool, layer).await;
                }
            }
            session.server.handle_request(request).await
        }
        // Parse errors still go back over the stream
        Err(_) => session.server.handle_message(&body).await,
    };

    if let Some(response) = response {
        if !session.send(response).await {
            warn!("Session {} stream is gone, dropping response", session_id);
            state.sessions.close(&session_id).await;
            return error_response(StatusCode::GONE, "session stream closed");
        }
    } else {
        debug!("Session {}: notification accepted", session_id);
    }

    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" })))
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    name: String,
    version: String,
    uptime_secs: i64,
    active_sessions: usize,
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.sessions.stats().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        name: "gnosis".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: stats.uptime_secs(),
        active_sessions: state.sessions.active_count().await,
    })
}

async fn info_handler(State(state): State<AppState>) -> impl IntoResponse {
    let pathologist = state.sessions.pathologist();
    let diagnosticators = pathologist.diagnosticators();
    let layers: Vec<Value> = pathologist
        .groups()
        .into_iter()
        .map(|group| {
            let members: Vec<&str> = diagnosticators
                .iter()
                .filter(|d| d.group == group)
                .map(|d| d.name.as_str())
                .collect();
            json!({
                "layer": group,
                "name": group_name(group),
                "diagnosticators": members,
            })
        })
        .collect();

    Json(json!({
        "name": "gnosis",
        "version": env!("CARGO_PKG_VERSION"),
        "framework_version": ontology::FRAMEWORK_VERSION,
        "axiom": ontology::ONTOLOGY_AXIOM,
        "tools": [tools::GNOSIS, tools::GNOSIS_JOURNEY, tools::GNOSIS_GLOSSARY, tools::CULTURAL_PATHOLOGY],
        "total_diagnosticators": diagnosticators.len(),
        "layers": layers,
        "fallacies": Fallacy::names(),
        "materiality": MaterialityGenus::names(),
        "transport": {
            "sse": "/sse",
            "messages": "/messages?sessionId=<id>",
        },
    }))
}

/// Statistics response
#[derive(Debug, Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    stats: ServerStats,
    active_sessions: usize,
    uptime_secs: i64,
}

async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.sessions.stats().await;
    let uptime_secs = stats.uptime_secs();
    Json(StatsResponse {
        stats,
        active_sessions: state.sessions.active_count().await,
        uptime_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::JsonRpcResponse;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(CulturalPathologist::new()),
            &ApiServerConfig::default(),
        )
    }

    #[test]
    fn test_config_from_http() {
        let config = ApiServerConfig::default();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.keepalive, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = test_state();
        let response = health_handler(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_message_to_unknown_session() {
        let state = test_state();
        let query = MessageQuery {
            session_id: Some(Uuid::new_v4().to_string()),
        };
        let response = message_handler(
            State(state),
            Query(query),
            r#"{"jsonrpc":"2.0","method":"ping","id":1}"#.to_string(),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_message_without_session_id() {
        let response = message_handler(
            State(test_state()),
            Query(MessageQuery { session_id: None }),
            String::new(),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_message_is_delivered_to_session() {
        let state = test_state();
        let (session, _guard, mut rx) = state.sessions.open().await;

        let body = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {
                "name": "cultural_pathology_analysis",
                "arguments": {"mode": "layer_diagnosis", "layer": 3, "description": "meritocracy"}
            },
            "id": 7
        });
        let response = message_handler(
            State(state.clone()),
            Query(MessageQuery {
                session_id: Some(session.id.to_string()),
            }),
            body.to_string(),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let delivered: JsonRpcResponse = rx.recv().await.unwrap();
        assert_eq!(delivered.id, Some(json!(7)));
        assert!(delivered.result.is_some());

        let stats = state.sessions.stats().await;
        assert_eq!(stats.operations_by_tool["cultural_pathology_analysis"], 1);
        assert_eq!(stats.diagnostics_by_layer["layer3"], 1);
    }
}
