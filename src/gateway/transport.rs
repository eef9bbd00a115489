//! Lazily-created, reusable HTTP connection to the gateway.

use crate::config::BridgeConfig;
use crate::gateway::GatewayError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Owns the single `reqwest::Client` used to reach the gateway.
///
/// `connect()` builds the client on first use and hands out the same one
/// afterwards; `close()` drops it so the next `connect()` starts fresh.
#[derive(Debug)]
pub struct GatewayTransport {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    client: Mutex<Option<reqwest::Client>>,
    clients_created: AtomicUsize,
}

impl GatewayTransport {
    /// Create a transport. Nothing is opened until `connect()`.
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
            timeout,
            client: Mutex::new(None),
            clients_created: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(&config.gateway_url, config.token(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path on the gateway.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Return the shared client, building it if none exists.
    pub async fn connect(&self) -> Result<reqwest::Client, GatewayError> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = self.build_client()?;
        self.clients_created.fetch_add(1, Ordering::Relaxed);
        debug!("Opened gateway connection to {}", self.base_url);
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drop the shared client. Safe to call when not connected.
    pub async fn close(&self) {
        if self.client.lock().await.take().is_some() {
            debug!("Closed gateway connection to {}", self.base_url);
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }

    /// Number of underlying clients built over this transport's lifetime.
    pub fn clients_created(&self) -> usize {
        self.clients_created.load(Ordering::Relaxed)
    }

    fn build_client(&self) -> Result<reqwest::Client, GatewayError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| GatewayError::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?)
    }
}
