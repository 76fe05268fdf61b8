//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, per-request session span)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every MCP request runs inside a span carrying its session id
//! - Secret header values never reach a log line
//! - Metrics are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
