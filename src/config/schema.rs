//! Configuration schema for tools-mcp.toml.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default gateway base URL.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:18789";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// OpenClaw gateway base URL.
    pub gateway_url: String,

    /// Bearer token for the gateway (empty = no Authorization header).
    pub gateway_token: String,

    /// Per-request timeout against the gateway.
    pub timeout_secs: u64,

    /// Log level (debug, info, warn, error).
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.into(),
            gateway_token: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: "info".into(),
        }
    }
}

impl BridgeConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token if one is configured.
    pub fn token(&self) -> Option<&str> {
        let token = self.gateway_token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// Token suitable for display: first four characters, rest masked.
    pub fn masked_token(&self) -> String {
        match self.token() {
            None => "(none)".into(),
            Some(t) if t.chars().count() <= 4 => "****".into(),
            Some(t) => format!("{}****", t.chars().take(4).collect::<String>()),
        }
    }
}
