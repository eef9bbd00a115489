//! openclaw-tools-mcp: MCP bridge to the OpenClaw gateway.
//!
//! Exposes the gateway's `cron`, `memory_search` and `memory_get` tools to
//! an MCP client over stdio, forwarding each call as one JSON-RPC request.

pub mod config;
pub mod gateway;
pub mod mcp;
pub mod tools;
pub mod types;
