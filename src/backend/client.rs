//! Backend client traits.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::session::BackendConfig;

/// Errors from a connected backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unsupported backend method: {0}")]
    UnsupportedMethod(String),

    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A handle to a backend that accepted the resolved configuration.
#[async_trait]
pub trait BackendClient: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Invoke a named backend operation.
    async fn call(&self, method: &str, params: Value) -> Result<Value, BackendError>;
}

/// Outcome of trying to reach a backend.
#[derive(Clone)]
pub enum Connection {
    Connected(Arc<dyn BackendClient>),
    Unavailable(String),
}

impl Connection {
    pub fn is_connected(&self) -> bool {
        matches!(self, Connection::Connected(client) if client.is_connected())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Connection::Connected(_) => f.write_str("Connected"),
            Connection::Unavailable(reason) => write!(f, "Unavailable({})", reason),
        }
    }
}

/// Builds clients from resolved configs.
#[async_trait]
pub trait BackendClientFactory: Send + Sync {
    async fn connect(&self, config: &BackendConfig) -> Connection;
}
