pub mod cron;
pub mod error;
pub mod memory;
pub mod traits;

pub use error::ToolError;
pub use traits::{Tool, ToolId};

use crate::gateway::{Gateway, GatewayError};
use crate::types::{error_payload, ToolDescriptor};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Tool registry
// ---------------------------------------------------------------------------

/// Fixed catalog of tools, each bound to its executor.
pub struct ToolRegistry {
    gateway: Arc<dyn Gateway>,
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Build the registry with every tool, in catalog order.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let tools: Vec<Box<dyn Tool>> = ToolId::ALL
            .into_iter()
            .map(|id| -> Box<dyn Tool> {
                match id {
                    ToolId::Cron => Box::new(cron::CronTool),
                    ToolId::MemorySearch => Box::new(memory::MemorySearchTool),
                    ToolId::MemoryGet => Box::new(memory::MemoryGetTool),
                }
            })
            .collect();

        Self { gateway, tools }
    }

    /// Descriptors of all tools, in declaration order.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    fn get(&self, id: ToolId) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.id() == id).map(|t| &**t)
    }

    /// Run a tool by name.
    ///
    /// Logical failures (unknown tool or action, missing or malformed
    /// arguments) come back as `Ok({"error": ...})` without touching the
    /// gateway. Only gateway failures are returned as `Err`.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        info!("Tool call: {}", name);

        let result = match ToolId::from_name(name).and_then(|id| self.get(id)) {
            Some(tool) => tool.execute(self.gateway.as_ref(), arguments).await,
            None => Err(ToolError::UnknownTool(name.to_string())),
        };

        match result {
            Ok(value) => Ok(value),
            Err(ToolError::Gateway(e)) => Err(e),
            Err(e) => {
                warn!("Tool {} rejected call: {}", name, e);
                Ok(error_payload(e.to_string()))
            }
        }
    }
}
