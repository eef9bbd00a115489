//! Tool trait definition.

use crate::gateway::Gateway;
use crate::tools::ToolError;
use crate::types::ToolDescriptor;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Identifier of every tool the bridge exposes, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    Cron,
    MemorySearch,
    MemoryGet,
}

impl ToolId {
    pub const ALL: [ToolId; 3] = [Self::Cron, Self::MemorySearch, Self::MemoryGet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cron => "cron",
            Self::MemorySearch => "memory_search",
            Self::MemoryGet => "memory_get",
        }
    }

    /// Resolve a tool name as sent by the client.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == name)
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An executor for one tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn id(&self) -> ToolId;

    /// Human-readable description, including usage examples.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments.
    fn parameters_schema(&self) -> Value;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.id().as_str().into(),
            description: self.description().into(),
            input_schema: self.parameters_schema(),
        }
    }

    /// Validate `args`, forward to the gateway, and return its result.
    async fn execute(
        &self,
        gateway: &dyn Gateway,
        args: Map<String, Value>,
    ) -> Result<Value, ToolError>;
}

/// Decode the raw argument mapping into a tool's typed argument struct.
pub fn decode_args<T: DeserializeOwned>(
    tool: ToolId,
    args: Map<String, Value>,
) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args)).map_err(|e| ToolError::InvalidArguments {
        tool: tool.as_str(),
        reason: e.to_string(),
    })
}

/// Read an optional string argument. `null` counts as unset; any other
/// non-string value is rejected.
pub fn string_arg(
    tool: ToolId,
    field: &'static str,
    value: Option<Value>,
) -> Result<Option<String>, ToolError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(invalid_type(tool, field, "a string", &other)),
    }
}

/// Read an optional boolean argument. `null` counts as unset.
pub fn bool_arg(
    tool: ToolId,
    field: &'static str,
    value: Option<Value>,
) -> Result<Option<bool>, ToolError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(other) => Err(invalid_type(tool, field, "a boolean", &other)),
    }
}

fn invalid_type(tool: ToolId, field: &str, expected: &str, got: &Value) -> ToolError {
    ToolError::InvalidArguments {
        tool: tool.as_str(),
        reason: format!("{field} must be {expected}, got {got}"),
    }
}

/// Whether an argument counts as supplied: not null, not an empty string,
/// not an empty object or array, and not `false`.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

/// Keep an optional argument only if it counts as supplied.
pub fn present<T>(value: Option<T>) -> Option<T>
where
    T: Into<Value> + Clone,
{
    value.filter(|v| is_present(&v.clone().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_ids_round_trip_names() {
        for id in ToolId::ALL {
            assert_eq!(ToolId::from_name(id.as_str()), Some(id));
        }
        assert_eq!(ToolId::from_name("Cron"), None);
    }

    #[test]
    fn falsy_values_are_not_present() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!({})));
        assert!(is_present(&json!({"k": 1})));
        assert!(is_present(&json!(0)));
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(Some("abc".to_string())), Some("abc".to_string()));
    }

    #[test]
    fn typed_readers_treat_null_as_unset() {
        assert_eq!(string_arg(ToolId::Cron, "jobId", Some(json!(null))).unwrap(), None);
        assert_eq!(bool_arg(ToolId::Cron, "includeDisabled", None).unwrap(), None);
        assert_eq!(
            string_arg(ToolId::Cron, "jobId", Some(json!("j1"))).unwrap(),
            Some("j1".to_string())
        );

        let err = string_arg(ToolId::Cron, "jobId", Some(json!(42))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid arguments for cron: jobId must be a string, got 42"
        );
    }
}
