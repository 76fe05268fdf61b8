//! MCP server core for Splunk.
//!
//! Resolves backend connection settings per request from client headers,
//! a per-session cache, or process defaults, and makes the request headers
//! and session id available to tools through an ambient request context.

pub mod admin;
pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mcp;
pub mod observability;
pub mod session;
pub mod tools;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
