//! Session registry and server statistics for the HTTP transport
//!
//! Every SSE connection is one MCP session with its own [`McpServer`] (and
//! therefore its own journal). Responses to POSTed messages are queued on
//! the session's channel and delivered over its event stream.

use crate::mcp::{JsonRpcResponse, McpServer, ToolHandler};
use crate::pathology::CulturalPathologist;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// A live MCP session
#[derive(Clone)]
pub struct Session {
    pub id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub server: Arc<McpServer>,
    outbound: mpsc::Sender<JsonRpcResponse>,
}

impl Session {
    /// Queue a response for the session's event stream
    ///
    /// Returns false when the stream has already gone away.
    pub async fn send(&self, response: JsonRpcResponse) -> bool {
        self.outbound.send(response).await.is_ok()
    }
}

/// Counters exposed on `/stats`
#[derive(Debug, Clone, Serialize)]
pub struct ServerStats {
    pub start_time: DateTime<Utc>,
    pub total_sessions: u64,
    pub total_operations: u64,
    pub operations_by_tool: BTreeMap<String, u64>,
    pub diagnostics_by_layer: BTreeMap<String, u64>,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            start_time: Utc::now(),
            total_sessions: 0,
            total_operations: 0,
            operations_by_tool: BTreeMap::new(),
            diagnostics_by_layer: BTreeMap::new(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}

/// Registry of open sessions
pub struct SessionManager {
    pathologist: Arc<CulturalPathologist>,
    capacity: usize,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    stats: Arc<RwLock<ServerStats>>,
}

impl SessionManager {
    pub fn new(pathologist: Arc<CulturalPathologist>, capacity: usize) -> Self {
        Self {
            pathologist,
            capacity: capacity.max(1),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(ServerStats::new())),
        }
    }

    pub fn pathologist(&self) -> &Arc<CulturalPathologist> {
        &self.pathologist
    }

    /// Open a session; the receiver feeds its event stream
    pub async fn open(&self) -> (Session, SessionGuard, mpsc::Receiver<JsonRpcResponse>) {
        let (tx, rx) = mpsc::channel(self.capacity);
        let session = Session {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            server: Arc::new(McpServer::new(ToolHandler::new(self.pathologist.clone()))),
            outbound: tx,
        };

        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        self.stats.write().await.total_sessions += 1;

        info!("Session {} opened", session.id);

        let guard = SessionGuard {
            id: session.id,
            sessions: self.sessions.clone(),
        };
        (session, guard, rx)
    }

    pub async fn get(&self, id: &Uuid) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn close(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!("Session {} closed", id);
        }
        removed
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Count one tool invocation
    pub async fn record_tool_call(&self, tool: &str, layer: Option<u64>) {
        let mut stats = self.stats.write().await;
        stats.total_operations += 1;
        *stats.operations_by_tool.entry(tool.to_string()).or_insert(0) += 1;
        if let Some(layer) = layer {
            *stats
                .diagnostics_by_layer
                .entry(format!("layer{}", layer))
                .or_insert(0) += 1;
        }
    }

    pub async fn stats(&self) -> ServerStats {
        self.stats.read().await.clone()
    }
}

/// Removes its session from the registry when dropped
///
/// Owned by the session's event stream, so a disconnected client cleans up
/// after itself.
pub struct SessionGuard {
    id: Uuid,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let id = self.id;
        let sessions = self.sessions.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if sessions.write().await.remove(&id).is_some() {
                    debug!("Session {} stream dropped", id);
                }
            });
        }
    }
}
