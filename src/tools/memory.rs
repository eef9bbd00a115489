//! `memory_search` and `memory_get` tools: semantic memory on the gateway.

use crate::gateway::Gateway;
use crate::tools::traits::{decode_args, present, Tool, ToolId};
use crate::tools::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const SEARCH_DESCRIPTION: &str = r#"Semantic search across MEMORY.md and memory/*.md files.

Use this tool before answering questions about:
- Prior work and decisions
- Dates and timelines
- People and contacts
- Preferences and settings
- TODOs and tasks

Returns top matching snippets with file path and line numbers.

PARAMETERS:
- query: Search query (required)
- maxResults: Maximum results to return (optional, default 10)
- minScore: Minimum similarity score (optional, 0.0-1.0)

EXAMPLE:
{
  "query": "what did we decide about authentication",
  "maxResults": 5
}
"#;

const GET_DESCRIPTION: &str = r#"Read specific lines from memory files.

Use after memory_search to retrieve full context for a snippet.
Keeps context small by only pulling needed lines.

PARAMETERS:
- path: Relative path to file (required)
- from: Starting line number (optional)
- lines: Number of lines to read (optional)

EXAMPLE:
{
  "path": "memory/2024-01-15.md",
  "from": 42,
  "lines": 20
}
"#;

// -- memory_search -----------------------------------------------------------

/// Arguments for `memory_search`; also the params forwarded to `memory.search`.
///
/// Unset optional fields are forwarded as `null`; set ones pass through
/// untouched for the gateway to interpret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySearchArgs {
    pub query: Option<String>,
    pub max_results: Option<Value>,
    pub min_score: Option<Value>,
}

impl MemorySearchArgs {
    pub fn validate(self) -> Result<Self, ToolError> {
        let Self {
            query,
            max_results,
            min_score,
        } = self;
        let query = present(query).ok_or(ToolError::MissingArgument("query"))?;
        Ok(Self {
            query: Some(query),
            max_results,
            min_score,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemorySearchTool;

#[async_trait]
impl Tool for MemorySearchTool {
    fn id(&self) -> ToolId {
        ToolId::MemorySearch
    }

    fn description(&self) -> &str {
        SEARCH_DESCRIPTION
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "maxResults": {
                    "type": "integer",
                    "description": "Maximum results to return"
                },
                "minScore": {
                    "type": "number",
                    "description": "Minimum similarity score (0.0-1.0)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        gateway: &dyn Gateway,
        args: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        let params = decode_args::<MemorySearchArgs>(self.id(), args)?.validate()?;
        Ok(gateway.call_tool("memory.search", json!(params)).await?)
    }
}

// -- memory_get --------------------------------------------------------------

/// Arguments for `memory_get`; also the params forwarded to `memory.get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryGetArgs {
    pub path: Option<String>,
    pub from: Option<Value>,
    pub lines: Option<Value>,
}

impl MemoryGetArgs {
    pub fn validate(self) -> Result<Self, ToolError> {
        let Self { path, from, lines } = self;
        let path = present(path).ok_or(ToolError::MissingArgument("path"))?;
        Ok(Self {
            path: Some(path),
            from,
            lines,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryGetTool;

#[async_trait]
impl Tool for MemoryGetTool {
    fn id(&self) -> ToolId {
        ToolId::MemoryGet
    }

    fn description(&self) -> &str {
        GET_DESCRIPTION
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Relative path to file"
                },
                "from": {
                    "type": "integer",
                    "description": "Starting line number"
                },
                "lines": {
                    "type": "integer",
                    "description": "Number of lines to read"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(
        &self,
        gateway: &dyn Gateway,
        args: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        let params = decode_args::<MemoryGetArgs>(self.id(), args)?.validate()?;
        Ok(gateway.call_tool("memory.get", json!(params)).await?)
    }
}
