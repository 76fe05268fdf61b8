//! Backend configuration carried in request headers.
//!
//! # Recognized headers
//! | Header                 | Field      | Conversion                         |
//! |------------------------|------------|------------------------------------|
//! | `X-Backend-Host`       | host       | passthrough                        |
//! | `X-Backend-Port`       | port       | integer                            |
//! | `X-Backend-Username`   | username   | passthrough                        |
//! | `X-Backend-Password`   | password   | passthrough (secret)               |
//! | `X-Backend-Scheme`     | scheme     | `http` / `https`                   |
//! | `X-Backend-Verify-TLS` | verify_tls | true iff equal to "true" (any case)|
//!
//! A malformed value drops that one field and is logged; the remaining
//! fields are still returned.

use axum::http::HeaderMap;
use thiserror::Error;

use crate::session::config::{BackendConfig, Scheme};

pub const X_BACKEND_HOST: &str = "x-backend-host";
pub const X_BACKEND_PORT: &str = "x-backend-port";
pub const X_BACKEND_USERNAME: &str = "x-backend-username";
pub const X_BACKEND_PASSWORD: &str = "x-backend-password";
pub const X_BACKEND_SCHEME: &str = "x-backend-scheme";
pub const X_BACKEND_VERIFY_TLS: &str = "x-backend-verify-tls";

/// One typed field of a [`BackendConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Host,
    Port,
    Username,
    Password,
    Scheme,
    VerifyTls,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Host,
        Field::Port,
        Field::Username,
        Field::Password,
        Field::Scheme,
        Field::VerifyTls,
    ];

    /// Lower-case header name carrying this field.
    pub fn header_name(&self) -> &'static str {
        match self {
            Field::Host => X_BACKEND_HOST,
            Field::Port => X_BACKEND_PORT,
            Field::Username => X_BACKEND_USERNAME,
            Field::Password => X_BACKEND_PASSWORD,
            Field::Scheme => X_BACKEND_SCHEME,
            Field::VerifyTls => X_BACKEND_VERIFY_TLS,
        }
    }

    /// Suffix used by the `MCP_SPLUNK_*` / `SPLUNK_*` environment variables.
    pub fn env_suffix(&self) -> &'static str {
        match self {
            Field::Host => "HOST",
            Field::Port => "PORT",
            Field::Username => "USERNAME",
            Field::Password => "PASSWORD",
            Field::Scheme => "SCHEME",
            Field::VerifyTls => "VERIFY_SSL",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password)
    }

    /// Convert `raw` and store it on `config`.
    ///
    /// Empty values are treated as absent and leave `config` untouched.
    pub fn apply(&self, config: &mut BackendConfig, raw: &str) -> Result<(), HeaderError> {
        if raw.is_empty() {
            return Ok(());
        }
        match self {
            Field::Host => config.host = Some(raw.to_string()),
            Field::Username => config.username = Some(raw.to_string()),
            Field::Password => config.password = Some(raw.to_string()),
            Field::Port => {
                let port = raw.trim().parse::<u16>().map_err(|_| HeaderError::InvalidPort {
                    value: raw.to_string(),
                })?;
                config.port = Some(port);
            }
            Field::Scheme => {
                let scheme = raw.parse::<Scheme>().map_err(|_| HeaderError::InvalidScheme {
                    value: raw.to_string(),
                })?;
                config.scheme = Some(scheme);
            }
            // Strict: "1", "yes", "on" all read as false.
            Field::VerifyTls => config.verify_tls = Some(raw.eq_ignore_ascii_case("true")),
        }
        Ok(())
    }
}

/// A header value that could not be converted to its field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("invalid port '{value}'")]
    InvalidPort { value: String },

    #[error("invalid scheme '{value}', expected http or https")]
    InvalidScheme { value: String },

    #[error("header {name} is not valid visible ASCII")]
    NotText { name: &'static str },
}

/// Extract a backend configuration from request headers.
///
/// Returns `None` when no recognized header yields a value.
pub fn extract_backend_config(headers: &HeaderMap) -> Option<BackendConfig> {
    let (config, errors) = extract_with_errors(headers);
    for err in &errors {
        tracing::warn!(error = %err, "Dropping malformed backend header");
    }
    config
}

/// Like [`extract_backend_config`] but hands back the per-field failures.
pub fn extract_with_errors(headers: &HeaderMap) -> (Option<BackendConfig>, Vec<HeaderError>) {
    let mut config = BackendConfig::default();
    let mut errors = Vec::new();

    for field in Field::ALL {
        let Some(value) = headers.get(field.header_name()) else {
            continue;
        };
        let raw = match value.to_str() {
            Ok(raw) => raw,
            Err(_) => {
                errors.push(HeaderError::NotText {
                    name: field.header_name(),
                });
                continue;
            }
        };
        if let Err(err) = field.apply(&mut config, raw) {
            errors.push(err);
        }
    }

    (config.non_empty(), errors)
}
