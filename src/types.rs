//! Shared types used across the bridge.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// Tool catalog
// ---------------------------------------------------------------------------

/// Description of one tool exposed to the MCP client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One incoming tool invocation. Absent or `null` arguments are empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    #[serde(rename = "name")]
    pub tool_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Gateway RPC envelope
// ---------------------------------------------------------------------------

/// Outbound RPC request body sent to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayCall {
    pub method: String,
    pub params: Value,
}

impl GatewayCall {
    /// Build the envelope for a tool call (`method = "tools.<tool_name>"`).
    pub fn for_tool(tool_name: &str, params: Value) -> Self {
        Self {
            method: format!("tools.{tool_name}"),
            params,
        }
    }
}

/// Response envelope returned by the gateway.
///
/// `error` wins over `result`; a body carrying neither is an empty success.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl GatewayResponse {
    /// Split the envelope into the result value or the remote error message.
    pub fn into_result(self) -> Result<Value, String> {
        match self.error {
            Some(Value::String(message)) => Err(message),
            Some(other) => Err(other.to_string()),
            None => Ok(match self.result {
                Some(Value::Null) | None => Value::Object(Map::new()),
                Some(value) => value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// MCP content
// ---------------------------------------------------------------------------

/// A single text content item in a `tools/call` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub r#type: String,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            r#type: "text".into(),
            text: text.into(),
        }
    }
}

/// Build the structured `{"error": ...}` payload used for logical failures.
pub fn error_payload(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}
