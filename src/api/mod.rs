//! HTTP/SSE transport for the MCP server
//!
//! Provides:
//! - Server-Sent Events (SSE) sessions, one journal each
//! - Message intake for those sessions
//! - Health, info and usage statistics endpoints

pub mod server;
pub mod sessions;

pub use server::{build_router, ApiServer, ApiServerConfig, AppState};
pub use sessions::{ServerStats, Session, SessionManager};
