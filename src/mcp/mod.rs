pub mod protocol;
pub mod server;

pub use protocol::{JsonRpcRequest, JsonRpcResponse};
pub use server::{McpServer, SessionState};
