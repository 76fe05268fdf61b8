//! Error types for the MCP endpoint.

use thiserror::Error;

use crate::backend::BackendError;

/// MCP request errors.
#[derive(Debug, Clone, Error)]
pub enum McpError {
    /// Body was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON was valid but not a JSON-RPC 2.0 request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown method: {0}")]
    MethodNotFound(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The backend answered with an error. Reported inside the tool result.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BackendError> for McpError {
    fn from(err: BackendError) -> Self {
        McpError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Internal(format!("JSON error: {}", err))
    }
}

/// JSON-RPC error codes.
pub mod rpc_codes {
    /// Parse error - Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found - The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params - Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error - Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

impl McpError {
    /// Convert to JSON-RPC error code.
    pub fn rpc_code(&self) -> i32 {
        match self {
            McpError::Parse(_) => rpc_codes::PARSE_ERROR,
            McpError::InvalidRequest(_) => rpc_codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) => rpc_codes::METHOD_NOT_FOUND,
            McpError::UnknownTool(_) | McpError::UnknownResource(_) | McpError::InvalidParams(_) => {
                rpc_codes::INVALID_PARAMS
            }
            McpError::Backend(_) | McpError::Internal(_) => rpc_codes::INTERNAL_ERROR,
        }
    }
}

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;
