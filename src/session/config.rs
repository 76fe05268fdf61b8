//! Backend connection parameters.
//!
//! Every field is optional. Defaulting of missing fields happens at the
//! backend client boundary, never here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder shown instead of secret values.
pub const REDACTED: &str = "***";

/// URL scheme used to reach the backend management port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(format!("expected http or https, got '{}'", other)),
        }
    }
}

/// A partial set of backend connection parameters.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Scheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_tls: Option<bool>,
}

impl BackendConfig {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }

    /// `None` for an empty record, so callers can tell "nothing found"
    /// apart from "found something".
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Names of the fields that are present, in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.host.is_some() {
            names.push("host");
        }
        if self.port.is_some() {
            names.push("port");
        }
        if self.username.is_some() {
            names.push("username");
        }
        if self.password.is_some() {
            names.push("password");
        }
        if self.scheme.is_some() {
            names.push("scheme");
        }
        if self.verify_tls.is_some() {
            names.push("verify_tls");
        }
        names
    }

    /// Fill every field missing from `self` with the value from `lower`.
    ///
    /// Only used to layer process defaults (env over config file). Session
    /// snapshots are never merged.
    pub fn or(self, lower: BackendConfig) -> BackendConfig {
        BackendConfig {
            host: self.host.or(lower.host),
            port: self.port.or(lower.port),
            username: self.username.or(lower.username),
            password: self.password.or(lower.password),
            scheme: self.scheme.or(lower.scheme),
            verify_tls: self.verify_tls.or(lower.verify_tls),
        }
    }

    /// JSON view with the password masked.
    pub fn redacted(&self) -> serde_json::Value {
        let mut masked = self.clone();
        if masked.password.is_some() {
            masked.password = Some(REDACTED.to_string());
        }
        serde_json::to_value(masked).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("scheme", &self.scheme)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_absent() {
        assert!(BackendConfig::default().is_empty());
        assert!(BackendConfig::default().non_empty().is_none());

        let cfg = BackendConfig {
            verify_tls: Some(false),
            ..Default::default()
        };
        assert!(!cfg.is_empty());
        assert_eq!(cfg.non_empty().unwrap().verify_tls, Some(false));
    }

    #[test]
    fn test_layering_fills_only_missing_fields() {
        let env = BackendConfig {
            host: Some("env.example.com".into()),
            ..Default::default()
        };
        let file = BackendConfig {
            host: Some("file.example.com".into()),
            port: Some(8089),
            ..Default::default()
        };

        let merged = env.or(file);
        assert_eq!(merged.host.as_deref(), Some("env.example.com"));
        assert_eq!(merged.port, Some(8089));
        assert!(merged.username.is_none());
    }

    #[test]
    fn test_password_never_rendered() {
        let cfg = BackendConfig {
            username: Some("admin".into()),
            password: Some("hunter2".into()),
            ..Default::default()
        };

        let debug = format!("{:?}", cfg);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains(REDACTED));

        let json = cfg.redacted();
        assert_eq!(json["password"], REDACTED);
        assert_eq!(json["username"], "admin");
        assert!(json.get("host").is_none());
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("HTTPS".parse::<Scheme>().unwrap(), Scheme::Https);
        assert_eq!(" http ".parse::<Scheme>().unwrap(), Scheme::Http);
        assert!("ftp".parse::<Scheme>().is_err());
    }
}
