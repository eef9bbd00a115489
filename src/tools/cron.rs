//! `cron` tool: manage scheduled jobs on the gateway's scheduler.

use crate::gateway::Gateway;
use crate::tools::traits::{bool_arg, decode_args, present, string_arg, Tool, ToolId};
use crate::tools::ToolError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const DESCRIPTION: &str = r#"Manage scheduled tasks and reminders.

ACTIONS:
- status: Check cron scheduler status
- list: List all jobs (use includeDisabled:true to include disabled)
- add: Create job (requires job object)
- update: Modify job (requires jobId + patch object)
- remove: Delete job (requires jobId)
- run: Trigger job immediately (requires jobId)
- runs: Get job run history (requires jobId)

JOB SCHEMA (for add action):
{
  "name": "string (optional)",
  "schedule": { ... },
  "payload": { ... },
  "sessionTarget": "main" | "isolated",
  "enabled": true | false
}

SCHEDULE TYPES:
- "at": One-shot at absolute time
  { "kind": "at", "atMs": <unix-ms-timestamp> }
- "every": Recurring interval
  { "kind": "every", "everyMs": <interval-ms> }
- "cron": Cron expression
  { "kind": "cron", "expr": "<cron-expression>", "tz": "<timezone>" }

PAYLOAD TYPES:
- "systemEvent": Injects text as system event
  { "kind": "systemEvent", "text": "<message>" }
- "agentTurn": Runs agent with message
  { "kind": "agentTurn", "message": "<prompt>" }

EXAMPLES:

Remind tomorrow at 9:00:
{
  "action": "add",
  "job": {
    "schedule": {"kind": "cron", "expr": "0 9 * * *", "tz": "Europe/Moscow"},
    "payload": {"kind": "agentTurn", "message": "Check PRs"},
    "sessionTarget": "isolated"
  }
}

List all jobs:
{"action": "list"}

Remove a job:
{"action": "remove", "jobId": "abc123"}
"#;

/// Actions accepted by the `cron` tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CronAction {
    Status,
    List,
    Add,
    Update,
    Remove,
    Run,
    Runs,
}

impl CronAction {
    pub const ALL: [CronAction; 7] = [
        Self::Status,
        Self::List,
        Self::Add,
        Self::Update,
        Self::Remove,
        Self::Run,
        Self::Runs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::List => "list",
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Run => "run",
            Self::Runs => "runs",
        }
    }

    /// Gateway method name, e.g. `cron.remove`.
    pub fn method(&self) -> String {
        format!("cron.{}", self.as_str())
    }
}

impl fmt::Display for CronAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CronAction {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ToolError::UnknownAction(s.to_string()))
    }
}

/// Arguments accepted by the `cron` tool.
///
/// Fields stay untyped until the action is known, so a field the chosen
/// action ignores never fails the call.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronArgs {
    pub action: Option<Value>,
    pub job: Option<Value>,
    pub job_id: Option<Value>,
    pub patch: Option<Value>,
    pub include_disabled: Option<Value>,
}

/// A validated cron request: which gateway method, with which params.
#[derive(Debug, Clone, PartialEq)]
pub struct CronRequest {
    pub action: CronAction,
    pub params: Value,
}

impl CronArgs {
    /// Validate required fields and shape the params for the chosen action.
    pub fn into_request(self) -> Result<CronRequest, ToolError> {
        let Self {
            action,
            job,
            job_id,
            patch,
            include_disabled,
        } = self;

        let action: CronAction = present(string_arg(ToolId::Cron, "action", action)?)
            .ok_or(ToolError::MissingArgument("action"))?
            .parse()?;

        let require_id = |action: &'static str| -> Result<String, ToolError> {
            present(string_arg(ToolId::Cron, "jobId", job_id.clone())?).ok_or(
                ToolError::MissingField {
                    field: "jobId",
                    action,
                },
            )
        };

        let params = match action {
            CronAction::Status => json!({}),
            CronAction::List => {
                let include = bool_arg(ToolId::Cron, "includeDisabled", include_disabled)?;
                json!({ "includeDisabled": include.unwrap_or(false) })
            }
            CronAction::Add => present(job).ok_or(ToolError::MissingField {
                field: "job",
                action: "add",
            })?,
            CronAction::Update => {
                let id = require_id("update")?;
                let patch = present(patch).ok_or(ToolError::MissingField {
                    field: "patch",
                    action: "update",
                })?;
                json!({ "id": id, "patch": patch })
            }
            CronAction::Remove | CronAction::Run | CronAction::Runs => {
                json!({ "id": require_id(action.as_str())? })
            }
        };

        Ok(CronRequest { action, params })
    }
}

/// Executor for the `cron` tool.
#[derive(Debug, Default)]
pub struct CronTool;

#[async_trait]
impl Tool for CronTool {
    fn id(&self) -> ToolId {
        ToolId::Cron
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn parameters_schema(&self) -> Value {
        let actions: Vec<&str> = CronAction::ALL.iter().map(CronAction::as_str).collect();
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": actions,
                    "description": "Action to perform"
                },
                "job": {
                    "type": "object",
                    "description": "Job definition (for add action)"
                },
                "jobId": {
                    "type": "string",
                    "description": "Job ID (for update/remove/run/runs)"
                },
                "patch": {
                    "type": "object",
                    "description": "Patch object (for update action)"
                },
                "includeDisabled": {
                    "type": "boolean",
                    "description": "Include disabled jobs in list"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(
        &self,
        gateway: &dyn Gateway,
        args: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        let request = decode_args::<CronArgs>(self.id(), args)?.into_request()?;
        debug!("cron action '{}'", request.action);

        Ok(gateway
            .call_tool(&request.action.method(), request.params)
            .await?)
    }
}
