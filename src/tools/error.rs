//! Tool execution errors.

use crate::gateway::GatewayError;
use thiserror::Error;

/// Failure while executing a tool.
///
/// Everything except `Gateway` is a logical failure: it is reported back to
/// the caller as an `{"error": ...}` payload and no network call is made.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A required argument is absent (tool-level requirement).
    #[error("{0} required")]
    MissingArgument(&'static str),

    /// A field required by one particular action is absent.
    #[error("{field} required for {action} action")]
    MissingField {
        field: &'static str,
        action: &'static str,
    },

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: &'static str, reason: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
