//! MCP server with stdio transport
//!
//! Implements a JSON-RPC 2.0 server that reads newline-delimited requests
//! from stdin and writes responses to stdout. The same request handling is
//! reused by the HTTP/SSE transport, one server per session.

use super::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, RESOURCE_NOT_FOUND,
    TOOL_EXECUTION_FAILED,
};
use super::resources;
use super::tools::ToolHandler;
use crate::error::{GnosisError, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

/// MCP server that handles JSON-RPC requests
pub struct McpServer {
    tool_handler: ToolHandler,
}

impl McpServer {
    pub fn new(tool_handler: ToolHandler) -> Self {
        Self { tool_handler }
    }

    pub fn tool_handler(&self) -> &ToolHandler {
        &self.tool_handler
    }

    /// Run the server over stdin/stdout until EOF
    pub async fn run(&self) -> Result<()> {
        info!("MCP server started, listening on stdin...");
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await?;
        info!("MCP server shutting down");
        Ok(())
    }

    /// Serve newline-delimited JSON-RPC over any reader/writer pair
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    debug!("Received EOF, shutting down");
                    break;
                }
                Ok(_) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    debug!("Received request: {}", line);

                    let Some(response) = self.handle_message(line).await else {
                        continue;
                    };

                    let response_json = encode(&response);
                    debug!("Sending response: {}", response_json);

                    writer.write_all(response_json.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Handle one raw message; `None` when no response is due
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Invalid JSON: {}", e)),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Route a parsed request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.clone(),
                JsonRpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            "resources/list" => self.handle_resources_list(request),
            "resources/read" => self.handle_resources_read(request),
            _ => {
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling initialize");

        JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": "gnosis",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "capabilities": {
                    "tools": {},
                    "resources": {}
                }
            }),
        )
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling tools/list");

        JsonRpcResponse::success(
            request.id,
            json!({ "tools": self.tool_handler.list_tools() }),
        )
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let Some((tool_name, arguments)) = tool_call_params(&request.params) else {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_params("params must be an object with a 'name' field"),
            );
        };

        debug!("Handling tools/call: {}", tool_name);

        match self.tool_handler.execute(&tool_name, arguments).await {
            Ok(output) => match serde_json::to_value(&output) {
                Ok(result) => JsonRpcResponse::success(request.id, result),
                Err(e) => JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::internal_error(format!("Serialization error: {}", e)),
                ),
            },
            Err(GnosisError::UnknownTool(name)) => JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", name)).with_data(json!({
                    "tools_available": self
                        .tool_handler
                        .list_tools()
                        .into_iter()
                        .map(|t| t.name)
                        .collect::<Vec<_>>()
                })),
            ),
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::application_error(
                        TOOL_EXECUTION_FAILED,
                        format!("Tool execution failed: {}", e),
                    ),
                )
            }
        }
    }

    fn handle_resources_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling resources/list");
        JsonRpcResponse::success(request.id, json!({ "resources": resources::list() }))
    }

    fn handle_resources_read(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let Some(uri) = request.params.get("uri").and_then(Value::as_str) else {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_params("missing 'uri' field"),
            );
        };

        debug!("Handling resources/read: {}", uri);

        match resources::read(uri, self.tool_handler.pathologist()) {
            Ok(contents) => JsonRpcResponse::success(request.id, json!({ "contents": [contents] })),
            Err(GnosisError::ResourceNotFound(uri)) => JsonRpcResponse::error(
                request.id,
                JsonRpcError::application_error(
                    RESOURCE_NOT_FOUND,
                    format!("Resource not found: {}", uri),
                ),
            ),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}

/// Tool name and arguments of a `tools/call` request
pub fn tool_call_params(params: &Value) -> Option<(String, Value)> {
    let params = params.as_object()?;
    let name = params.get("name")?.as_str()?.to_string();
    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(Value::Object(serde_json::Map::new()));
    Some((name, arguments))
}

/// Serialize a response, falling back to a bare internal error
pub fn encode(response: &JsonRpcResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        error!("Failed to serialize response: {}", e);
        format!(
            r#"{{"jsonrpc":"2.0","error":{{"code":-32603,"message":"Serialization error"}},"id":{}}}"#,
            response
                .id
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_else(|| "null".to_string())
        )
    })
}
