//! MCP server over stdio.
//!
//! Reads one JSON-RPC message per line, handles it completely (including
//! the gateway round trip), writes the response line, then reads the next.
//!
//! Supported methods:
//! - `initialize`: server info + capabilities
//! - `notifications/initialized`: client ack (no response)
//! - `ping`: liveness check
//! - `tools/list`: the tool catalog
//! - `tools/call`: run one tool

use crate::mcp::protocol::{error_codes, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
use crate::tools::ToolRegistry;
use crate::types::{InvocationRequest, TextContent};
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "openclaw-tools";

/// Session states: waiting for a message, or working on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Handling,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Handling => write!(f, "handling"),
        }
    }
}

/// Adapts the tool registry to the MCP stdio protocol.
pub struct McpServer {
    registry: ToolRegistry,
    state: SessionState,
    handled: u64,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            state: SessionState::Idle,
            handled: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of messages handled so far (notifications included).
    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// Serve the session until EOF on `reader` or until `cancel` fires.
    ///
    /// Cancellation is only observed while idle; an in-flight request is
    /// always answered first. Tool failures never end the session.
    pub async fn serve<R, W>(
        &mut self,
        mut reader: R,
        mut writer: W,
        cancel: CancellationToken,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP session started");
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => {
                    read.context("Failed to read MCP message")?
                }
                _ = cancel.cancelled() => {
                    info!("MCP session cancelled");
                    break;
                }
            };

            if read == 0 {
                info!("MCP client closed input");
                break;
            }
            if buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            self.set_state(SessionState::Handling);
            let response = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line).await,
                Err(e) => {
                    debug!("MCP message is not valid UTF-8: {e}");
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        error_codes::PARSE_ERROR,
                        format!("Parse error: {e}"),
                    ))
                }
            };
            if let Some(response) = response {
                let mut out =
                    serde_json::to_string(&response).context("Failed to encode MCP response")?;
                out.push('\n');
                writer
                    .write_all(out.as_bytes())
                    .await
                    .context("Failed to write MCP response")?;
                writer.flush().await.context("Failed to flush MCP response")?;
            }
            self.handled += 1;
            self.set_state(SessionState::Idle);
        }

        Ok(())
    }

    fn set_state(&mut self, next: SessionState) {
        debug!("MCP session {} -> {}", self.state, next);
        self.state = next;
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                debug!("Unparseable MCP message: {e}");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid Request: {e}"),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Route one decoded request to its method handler.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "MCP request");

        if request.is_notification() {
            if request.method != "notifications/initialized" {
                debug!("Ignoring notification {}", request.method);
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let params = request.params.unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result(&params)),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                json!({ "tools": self.registry.list_tools() }),
            ),
            "tools/call" => match serde_json::from_value::<InvocationRequest>(params) {
                Ok(call) if !call.tool_name.is_empty() => {
                    let result = self.call_tool(&call.tool_name, call.arguments).await;
                    JsonRpcResponse::success(id, result)
                }
                Ok(_) => JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing 'name' in params",
                ),
                Err(e) => JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tools/call params: {e}"),
                ),
            },
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };

        Some(response)
    }

    /// Run a tool and wrap the outcome as a single text content item.
    ///
    /// Gateway faults become `"Error: <message>"` here and go no further.
    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Value {
        let (text, is_error) = match self.registry.dispatch(name, arguments).await {
            Ok(payload) => (payload.to_string(), false),
            Err(e) => {
                error!("Tool {} failed: {}", name, e);
                (format!("Error: {e}"), true)
            }
        };

        json!({
            "content": [TextContent::new(text)],
            "isError": is_error,
        })
    }
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}
