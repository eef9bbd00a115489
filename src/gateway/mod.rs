pub mod client;
pub mod error;
pub mod transport;

pub use client::GatewayClient;
pub use error::GatewayError;
pub use transport::GatewayTransport;

use async_trait::async_trait;
use serde_json::Value;

/// Seam between tool executors and the remote gateway.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Invoke `tools.<tool_name>` on the gateway and return its `result`.
    async fn call_tool(&self, tool_name: &str, params: Value) -> Result<Value, GatewayError>;
}
