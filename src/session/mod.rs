//! Per-session backend configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound HTTP request
//!     → context.rs (capture headers, derive session id, enter scope)
//!     → resolver.rs
//!         → headers.rs (X-Backend-* → BackendConfig)
//!         → cache.rs (write on header hit, read on miss)
//!         → process defaults (env / config file)
//!     → ResolvedConfig attached to request extensions
//!     → tool handler
//!
//! On session termination:
//!     lifecycle.rs → cache.rs (remove)
//! ```
//!
//! # Design Decisions
//! - The cache is the only shared mutable state; everything else lives
//!   and dies with the request
//! - The anonymous session ("-") is never used as a cache key
//! - Header-derived config always wins over cache, cache over defaults

pub mod cache;
pub mod config;
pub mod context;
pub mod headers;
pub mod lifecycle;
pub mod resolver;

pub use cache::SessionConfigCache;
pub use config::{BackendConfig, Scheme};
pub use context::{RequestContext, SessionId};
pub use headers::{extract_backend_config, HeaderError};
pub use lifecycle::SessionLifecycle;
pub use resolver::{ConfigResolver, ConfigSource, ResolvedConfig};
