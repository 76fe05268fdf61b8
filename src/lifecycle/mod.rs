//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber's recv() resolves → server drains → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//! ```
//!
//! In-flight requests finish with the config they already resolved; the
//! session cache is dropped with the process.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
