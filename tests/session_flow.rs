//! End-to-end session resolution over HTTP.

use reqwest::StatusCode;
use serde_json::{json, Value};

use splunk_mcp_server::config::ServerConfig;
use splunk_mcp_server::session::BackendConfig;

mod common;

use common::{post_mcp, rpc, session_config, TestServer};

const S1: (&str, &str) = ("X-Session-ID", "s1");
const S2: (&str, &str) = ("X-Session-ID", "s2");
const HOST_A: (&str, &str) = ("X-Backend-Host", "a.example.com");

#[tokio::test]
async fn test_headers_then_cache_then_termination() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    // 1: headers win and are remembered for s1
    let first = session_config(&client, &server, &[HOST_A, S1]).await;
    assert_eq!(first["source"], "headers");
    assert_eq!(first["config"], json!({ "host": "a.example.com" }));
    assert_eq!(server.cache.len(), 1);

    // 2: same session, no backend headers
    let second = session_config(&client, &server, &[S1]).await;
    assert_eq!(second["source"], "session");
    assert_eq!(second["config"]["host"], "a.example.com");

    // 3: another session sees only the defaults
    let third = session_config(&client, &server, &[S2]).await;
    assert_eq!(third["source"], "defaults");
    assert_eq!(third["config"], json!({}));

    // 4: termination notification for s1
    let res = post_mcp(
        &client,
        &server,
        &[S2],
        rpc(None, "session/terminate", json!({ "sessionId": "s1" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert!(server.cache.is_empty());

    // 5: s1 no longer resolves to the old host
    let fifth = session_config(&client, &server, &[S1]).await;
    assert_eq!(fifth["source"], "defaults");
    assert!(fifth["config"].get("host").is_none());

    server.stop();
}

#[tokio::test]
async fn test_defaults_apply_to_unknown_sessions() {
    let defaults = BackendConfig {
        host: Some("default.example.com".into()),
        username: Some("svc".into()),
        password: Some("secret".into()),
        ..Default::default()
    };
    let server = TestServer::start(ServerConfig::default(), defaults).await;
    let client = reqwest::Client::new();

    let resolved = session_config(&client, &server, &[S1]).await;
    assert_eq!(resolved["source"], "defaults");
    assert_eq!(resolved["config"]["host"], "default.example.com");
    assert_eq!(resolved["config"]["password"], "***");
    assert!(server.cache.is_empty());

    server.stop();
}

#[tokio::test]
async fn test_anonymous_requests_are_never_cached() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    let resolved = session_config(&client, &server, &[HOST_A]).await;
    assert_eq!(resolved["source"], "headers");
    assert_eq!(resolved["session_id"], "-");
    assert!(server.cache.is_empty());

    let later = session_config(&client, &server, &[]).await;
    assert_eq!(later["source"], "defaults");

    server.stop();
}

#[tokio::test]
async fn test_malformed_port_drops_only_that_field() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    let resolved = session_config(
        &client,
        &server,
        &[HOST_A, ("X-Backend-Port", "eighty"), ("X-Backend-Scheme", "HTTP"), S1],
    )
    .await;

    assert_eq!(resolved["source"], "headers");
    assert_eq!(
        resolved["config"],
        json!({ "host": "a.example.com", "scheme": "http" })
    );

    server.stop();
}

#[tokio::test]
async fn test_tools_use_resolved_config() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    let call = rpc(Some(7), "tools/call", json!({ "name": "list_indexes" }));
    let res = post_mcp(&client, &server, &[HOST_A, ("X-Backend-Port", "8089"), S1], call.clone()).await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["result"]["isError"], false);
    let text: Value =
        serde_json::from_str(body["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(text["indexes"], json!(["main", "_internal"]));

    // Cached config reaches the backend on the follow-up call.
    let res = post_mcp(&client, &server, &[S1], call).await;
    assert_eq!(res.status(), StatusCode::OK);

    let seen = server.backend.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[1].port, Some(8089));

    server.stop();
}

#[tokio::test]
async fn test_user_agent_info_masks_credentials() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    let res = post_mcp(
        &client,
        &server,
        &[S1, HOST_A, ("X-Backend-Password", "hunter2"), ("User-Agent", "probe/1.0")],
        rpc(Some(1), "tools/call", json!({ "name": "user_agent_info" })),
    )
    .await;
    let body: Value = res.json().await.unwrap();
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(!text.contains("hunter2"));

    let info: Value = serde_json::from_str(text).unwrap();
    assert_eq!(info["headers"]["user-agent"], "probe/1.0");
    assert_eq!(info["headers"]["x-backend-password"], "***");
    assert_eq!(info["context"]["session_id"], "s1");
    assert_eq!(info["context"]["config_source"], "headers");

    server.stop();
}

#[tokio::test]
async fn test_delete_ends_session() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    session_config(&client, &server, &[HOST_A, S1]).await;
    session_config(&client, &server, &[HOST_A, S2]).await;
    assert_eq!(server.cache.len(), 2);

    let res = client
        .delete(server.url("/mcp"))
        .header("Mcp-Session-Id", "s1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(server.cache.len(), 1);

    let res = client.delete(server.url("/mcp")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    server.stop();
}

#[tokio::test]
async fn test_initialize_assigns_session_header() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    let res = post_mcp(&client, &server, &[], rpc(Some(1), "initialize", json!({}))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let assigned = res
        .headers()
        .get("mcp-session-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    assert!(!assigned.is_empty());
    assert_ne!(assigned, "-");

    let res = post_mcp(&client, &server, &[S1], rpc(Some(2), "initialize", json!({}))).await;
    assert_eq!(res.headers()["mcp-session-id"], "s1");

    server.stop();
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/mcp"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);

    server.stop();
}

#[tokio::test]
async fn test_null_id_gets_a_response() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    let res = post_mcp(
        &client,
        &server,
        &[S1],
        json!({ "jsonrpc": "2.0", "id": null, "method": "ping" }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["result"], json!({}));

    server.stop();
}

#[tokio::test]
async fn test_admin_requires_bearer_token() {
    let mut config = ServerConfig::default();
    config.admin.enabled = true;
    config.admin.api_key = "test-key".into();
    let server = TestServer::start(config, BackendConfig::default()).await;
    let client = reqwest::Client::new();

    session_config(&client, &server, &[HOST_A, ("X-Backend-Password", "hunter2"), S1]).await;

    let res = client.get(server.url("/admin/sessions")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/admin/sessions?values=true"))
        .bearer_auth("test-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let sessions: Value = res.json().await.unwrap();
    assert_eq!(sessions["s1"]["host"], "a.example.com");
    assert_eq!(sessions["s1"]["password"], "***");

    let res = client
        .delete(server.url("/admin/sessions/s1"))
        .bearer_auth("test-key")
        .send()
        .await
        .unwrap();
    let outcome: Value = res.json().await.unwrap();
    assert_eq!(outcome["removed"], true);
    assert!(server.cache.is_empty());

    server.stop();
}

#[tokio::test]
async fn test_health_reports_cached_sessions() {
    let server = TestServer::start(ServerConfig::default(), BackendConfig::default()).await;
    let client = reqwest::Client::new();

    session_config(&client, &server, &[HOST_A, S1]).await;

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let health: Value = res.json().await.unwrap();
    assert_eq!(health["status"], "OK");
    assert_eq!(health["cached_sessions"], 1);

    server.stop();
}
