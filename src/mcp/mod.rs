//! MCP over HTTP: JSON-RPC 2.0 types and method dispatch.
//!
//! # Data Flow
//! ```text
//! POST /mcp body
//!     → jsonrpc.rs (parse request)
//!     → handler.rs (route by method)
//!         → tools (tools/list, tools/call)
//!         → resources.rs (resources/list, resources/read)
//!         → session lifecycle (session/terminate|end|close)
//!     → JsonRpcResponse (or 202 for notifications)
//! ```

pub mod error;
pub mod handler;
pub mod jsonrpc;
pub mod resources;

pub use error::McpError;
pub use handler::McpHandler;
pub use jsonrpc::{JsonRpcRequest, JsonRpcResponse};
