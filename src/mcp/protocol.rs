//! JSON-RPC 2.0 protocol types and MCP result envelopes
//!
//! Shared by the stdio server and the HTTP/SSE transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP protocol revision announced during `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Error code for failed tool execution
pub const TOOL_EXECUTION_FAILED: i32 = -32000;

/// Error code for an unknown resource URI
pub const RESOURCE_NOT_FOUND: i32 = -32002;

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,

    /// Method name to invoke
    pub method: String,

    /// Parameters (can be object or array)
    #[serde(default)]
    pub params: Value,

    /// Request ID (absent for notifications)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Notifications carry no id and never get a response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,

    /// Result (present if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error (present if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Request ID (echoed from request)
    pub id: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Parse error (-32700)
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::with_code(-32700, message)
    }

    /// Invalid request (-32600)
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_code(-32600, message)
    }

    /// Method not found (-32601)
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::with_code(-32601, format!("Method not found: {}", method.into()))
    }

    /// Invalid params (-32602)
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::with_code(-32602, message)
    }

    /// Internal error (-32603)
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_code(-32603, message)
    }

    /// Application error (custom code)
    pub fn application_error(code: i32, message: impl Into<String>) -> Self {
        Self::with_code(code, message)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// One block of tool output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Result of `tools/call`
///
/// Tool-level failures (bad tag, unknown author...) are reported here with
/// `isError` set rather than as JSON-RPC errors, so the model can read the
/// message and correct its call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output carrying a pretty-printed JSON payload
    pub fn json(payload: &Value) -> Self {
        Self::text(pretty(payload), false)
    }

    /// Failed output carrying a pretty-printed JSON payload
    pub fn error(payload: &Value) -> Self {
        Self::text(pretty(payload), true)
    }

    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text,
            }],
            is_error,
        }
    }

    /// Parse the first content block back into JSON
    pub fn payload(&self) -> Option<Value> {
        self.content
            .first()
            .and_then(|c| serde_json::from_str(&c.text).ok())
    }
}

fn pretty(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}
