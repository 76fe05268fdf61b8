//! Backend client boundary.
//!
//! The resolver hands a possibly partial [`BackendConfig`] to a
//! [`BackendClientFactory`]; defaults for missing fields are applied here and
//! nowhere earlier. A missing or unreachable backend is reported as
//! [`Connection::Unavailable`], not as an error.
//!
//! [`BackendConfig`]: crate::session::BackendConfig

pub mod client;
pub mod splunk;

pub use client::{BackendClient, BackendClientFactory, BackendError, Connection};
pub use splunk::SplunkClientFactory;
