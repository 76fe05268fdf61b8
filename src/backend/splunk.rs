//! Splunk management REST client.
//!
//! # Defaults applied at this boundary
//! - host `localhost`, port 8089, scheme https
//! - TLS verification off unless `verify_tls` is true
//!
//! Username and password are required; without them the backend is
//! reported unavailable.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::backend::client::{BackendClient, BackendClientFactory, BackendError, Connection};
use crate::session::{BackendConfig, Scheme};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8089;

/// Backend methods and the REST endpoints serving them.
const METHODS: [(&str, &str); 4] = [
    ("server/info", "services/server/info"),
    ("data/indexes", "services/data/indexes"),
    ("apps/local", "services/apps/local"),
    ("authentication/current-context", "services/authentication/current-context"),
];

/// Fully defaulted connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub base_url: Url,
    pub username: String,
    pub password: String,
    pub verify_tls: bool,
}

impl ConnectionParams {
    /// Apply boundary defaults. `Err` carries the reason the config is unusable.
    pub fn from_config(config: &BackendConfig) -> Result<Self, String> {
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            return Err("backend username and password are not configured".to_string());
        };

        let scheme = config.scheme.unwrap_or(Scheme::Https);
        let host = config.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = config.port.unwrap_or(DEFAULT_PORT);
        let base_url = Url::parse(&format!("{}://{}:{}/", scheme, host, port))
            .map_err(|e| format!("invalid backend address: {}", e))?;

        Ok(Self {
            base_url,
            username: username.clone(),
            password: password.clone(),
            verify_tls: config.verify_tls.unwrap_or(false),
        })
    }
}

/// Connects to Splunk over its management port.
pub struct SplunkClientFactory {
    timeout: Duration,
}

impl SplunkClientFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl BackendClientFactory for SplunkClientFactory {
    async fn connect(&self, config: &BackendConfig) -> Connection {
        let params = match ConnectionParams::from_config(config) {
            Ok(p) => p,
            Err(reason) => return Connection::Unavailable(reason),
        };

        let http = match Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!params.verify_tls)
            .build()
        {
            Ok(c) => c,
            Err(e) => return Connection::Unavailable(format!("failed to build HTTP client: {}", e)),
        };

        let client = SplunkClient {
            http,
            params,
        };

        // Probe once so callers learn about bad credentials up front.
        match client.call("server/info", Value::Null).await {
            Ok(_) => {
                tracing::debug!(base_url = %client.params.base_url, "Backend connection established");
                Connection::Connected(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(base_url = %client.params.base_url, error = %e, "Backend unavailable");
                Connection::Unavailable(e.to_string())
            }
        }
    }
}

/// A connected Splunk REST client.
pub struct SplunkClient {
    http: Client,
    params: ConnectionParams,
}

impl SplunkClient {
    fn endpoint(&self, method: &str) -> Result<Url, BackendError> {
        let path = METHODS
            .iter()
            .find(|(name, _)| *name == method)
            .map(|(_, path)| *path)
            .ok_or_else(|| BackendError::UnsupportedMethod(method.to_string()))?;
        Ok(self.params.base_url.join(path)?)
    }
}

#[async_trait]
impl BackendClient for SplunkClient {
    fn is_connected(&self) -> bool {
        true
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, BackendError> {
        let url = self.endpoint(method)?;

        let mut query: Vec<(String, String)> = vec![("output_mode".into(), "json".into())];
        if let Value::Object(map) = params {
            for (k, v) in map {
                let v = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                query.push((k, v));
            }
        }

        let response = self
            .http
            .request(Method::GET, url)
            .basic_auth(&self.params.username, Some(&self.params.password))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
