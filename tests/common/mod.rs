//! Shared utilities for integration testing.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use splunk_mcp_server::backend::{BackendClient, BackendClientFactory, BackendError, Connection};
use splunk_mcp_server::config::ServerConfig;
use splunk_mcp_server::session::{BackendConfig, SessionConfigCache};
use splunk_mcp_server::{HttpServer, Shutdown};

/// Backend factory that records every config it is asked to connect with.
///
/// Connects only when a host is present; the fake client answers
/// `server/info` and `data/indexes` with canned payloads.
#[derive(Default)]
pub struct RecordingBackend {
    seen: Mutex<Vec<BackendConfig>>,
}

impl RecordingBackend {
    pub fn seen(&self) -> Vec<BackendConfig> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendClientFactory for RecordingBackend {
    async fn connect(&self, config: &BackendConfig) -> Connection {
        self.seen.lock().unwrap().push(config.clone());
        match &config.host {
            Some(host) => Connection::Connected(Arc::new(FakeSplunk { host: host.clone() })),
            None => Connection::Unavailable("no backend host configured".into()),
        }
    }
}

struct FakeSplunk {
    host: String,
}

#[async_trait]
impl BackendClient for FakeSplunk {
    fn is_connected(&self) -> bool {
        true
    }

    async fn call(&self, method: &str, _params: Value) -> Result<Value, BackendError> {
        match method {
            "server/info" => Ok(json!({ "entry": [{ "name": self.host }] })),
            "data/indexes" => Ok(json!({
                "entry": [{ "name": "main" }, { "name": "_internal" }]
            })),
            other => Err(BackendError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A server bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub cache: Arc<SessionConfigCache>,
    pub backend: Arc<RecordingBackend>,
    shutdown: Shutdown,
}

impl TestServer {
    pub async fn start(config: ServerConfig, defaults: BackendConfig) -> Self {
        let backend = Arc::new(RecordingBackend::default());
        let server = HttpServer::with_backend(config, defaults, backend.clone());
        let cache = server.cache();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();

        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self {
            addr,
            cache,
            backend,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Build a JSON-RPC request body.
pub fn rpc(id: Option<u64>, method: &str, params: Value) -> Value {
    let mut body = json!({ "jsonrpc": "2.0", "method": method, "params": params });
    if let Some(id) = id {
        body["id"] = json!(id);
    }
    body
}

/// POST one message to `/mcp` with extra headers.
pub async fn post_mcp(
    client: &reqwest::Client,
    server: &TestServer,
    headers: &[(&str, &str)],
    body: Value,
) -> reqwest::Response {
    let mut request = client.post(server.url("/mcp")).json(&body);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request.send().await.unwrap()
}

/// Read `session://config` as seen by a request with `headers`.
pub async fn session_config(
    client: &reqwest::Client,
    server: &TestServer,
    headers: &[(&str, &str)],
) -> Value {
    let res = post_mcp(
        client,
        server,
        headers,
        rpc(Some(1), "resources/read", json!({ "uri": "session://config" })),
    )
    .await;
    let body: Value = res.json().await.unwrap();
    let text = body["result"]["contents"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}
