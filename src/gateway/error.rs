//! Gateway error taxonomy.

use thiserror::Error;

/// Failures reaching the gateway or reported by it.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Non-2xx HTTP status from the RPC endpoint.
    #[error("gateway returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection failure, timeout, or client construction failure.
    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured token cannot be sent as a header value.
    #[error("invalid gateway token: {0}")]
    InvalidToken(String),

    /// The response body was not a JSON envelope.
    #[error("invalid gateway response: {0}")]
    Decode(String),

    /// The gateway answered with an `error` field.
    #[error("{0}")]
    Remote(String),
}

impl GatewayError {
    /// HTTP status for `Http` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
