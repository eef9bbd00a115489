//! OpenClaw gateway RPC client.

use crate::config::BridgeConfig;
use crate::gateway::{Gateway, GatewayError, GatewayTransport};
use crate::types::{GatewayCall, GatewayResponse};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// RPC endpoint path on the gateway.
pub const RPC_PATH: &str = "/rpc";

/// Forwards tool calls to the gateway's RPC endpoint, once each.
#[derive(Debug)]
pub struct GatewayClient {
    transport: GatewayTransport,
}

impl GatewayClient {
    pub fn new(transport: GatewayTransport) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(GatewayTransport::from_config(config))
    }

    pub fn transport(&self) -> &GatewayTransport {
        &self.transport
    }

    /// Release the underlying connection.
    pub async fn close(&self) {
        self.transport.close().await;
    }

    /// Send one RPC envelope and unwrap the response.
    pub async fn send(&self, call: &GatewayCall) -> Result<Value, GatewayError> {
        debug!("Gateway RPC: {}", call.method);

        let http = self.transport.connect().await?;
        let resp = http
            .post(self.transport.url(RPC_PATH))
            .json(call)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let envelope: GatewayResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        envelope.into_result().map_err(GatewayError::Remote)
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn call_tool(&self, tool_name: &str, params: Value) -> Result<Value, GatewayError> {
        self.send(&GatewayCall::for_tool(tool_name, params)).await
    }
}
