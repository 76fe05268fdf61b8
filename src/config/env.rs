//! Process-wide backend defaults from the environment.
//!
//! For each field the client-scoped `MCP_SPLUNK_*` variable wins over the
//! server-scoped `SPLUNK_*` one. Values use the same conversions as the
//! request headers; malformed values are dropped and logged.

use crate::session::headers::Field;
use crate::session::BackendConfig;

/// Prefixes consulted in priority order.
pub const ENV_PREFIXES: [&str; 2] = ["MCP_SPLUNK_", "SPLUNK_"];

/// Read defaults from the process environment.
pub fn backend_defaults_from_env() -> BackendConfig {
    backend_defaults_from(|name| std::env::var(name).ok())
}

/// Read defaults through an arbitrary lookup.
pub fn backend_defaults_from<F>(lookup: F) -> BackendConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = BackendConfig::default();

    for field in Field::ALL {
        let found = ENV_PREFIXES.iter().find_map(|prefix| {
            let name = format!("{}{}", prefix, field.env_suffix());
            lookup(&name)
                .filter(|value| !value.is_empty())
                .map(|value| (name, value))
        });
        let Some((name, value)) = found else {
            continue;
        };
        if let Err(e) = field.apply(&mut config, &value) {
            tracing::warn!(variable = %name, error = %e, "Ignoring malformed environment default");
        }
    }

    config
}

/// Environment defaults layered over the `[backend]` file section.
pub fn resolve_defaults(file: &BackendConfig, env: BackendConfig) -> BackendConfig {
    env.or(file.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Scheme;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_no_environment_gives_empty_defaults() {
        assert!(backend_defaults_from(env(&[])).is_empty());
    }

    #[test]
    fn test_client_prefix_wins_per_field() {
        let cfg = backend_defaults_from(env(&[
            ("MCP_SPLUNK_HOST", "client.example.com"),
            ("SPLUNK_HOST", "server.example.com"),
            ("SPLUNK_PORT", "8089"),
            ("SPLUNK_SCHEME", "http"),
            ("MCP_SPLUNK_VERIFY_SSL", "True"),
        ]));

        assert_eq!(cfg.host.as_deref(), Some("client.example.com"));
        assert_eq!(cfg.port, Some(8089));
        assert_eq!(cfg.scheme, Some(Scheme::Http));
        assert_eq!(cfg.verify_tls, Some(true));
    }

    #[test]
    fn test_malformed_values_are_dropped() {
        let cfg = backend_defaults_from(env(&[
            ("SPLUNK_PORT", "not-a-port"),
            ("SPLUNK_USERNAME", "admin"),
        ]));

        assert!(cfg.port.is_none());
        assert_eq!(cfg.username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = BackendConfig {
            host: Some("file.example.com".into()),
            port: Some(18089),
            ..Default::default()
        };
        let cfg = resolve_defaults(
            &file,
            backend_defaults_from(env(&[("SPLUNK_HOST", "env.example.com")])),
        );

        assert_eq!(cfg.host.as_deref(), Some("env.example.com"));
        assert_eq!(cfg.port, Some(18089));
    }
}
