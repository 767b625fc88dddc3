//! Model Context Protocol (MCP) server implementation
//!
//! JSON-RPC 2.0 request handling shared by the stdio and HTTP/SSE
//! transports, exposing the journal, glossary and pathology tools plus a
//! few read-only resources.

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolOutput};
pub use server::McpServer;
pub use tools::ToolHandler;
