//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID)
//!     → middleware.rs (request scope: headers, session id, resolved config)
//!     → rpc.rs (POST/DELETE /mcp → mcp::McpHandler)
//!     → Send to client
//! ```

pub mod health;
pub mod middleware;
pub mod request;
pub mod rpc;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
