//! Request introspection tools.

use axum::http::HeaderMap;
use serde_json::{json, Map, Value as JsonValue};

use crate::mcp::error::{McpError, Result};
use crate::session::cache::sanitize;
use crate::session::RequestContext;
use crate::tools::{ToolContext, ToolDef};

pub const USER_AGENT_INFO: &str = "user_agent_info";

pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        USER_AGENT_INFO,
        "Return the request headers (sensitive values masked), the session id and the \
         backend configuration resolved for this request.",
        json!({ "type": "object", "properties": {} }),
    )]
}

pub fn handles(name: &str) -> bool {
    name == USER_AGENT_INFO
}

pub fn dispatch(ctx: &ToolContext, name: &str, _args: Map<String, JsonValue>) -> Result<JsonValue> {
    match name {
        USER_AGENT_INFO => Ok(user_agent_info(ctx)),
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}

fn user_agent_info(ctx: &ToolContext) -> JsonValue {
    // Headers come from the ambient request, not from the caller.
    let headers = RequestContext::current()
        .map(|request| masked_headers(request.headers()))
        .unwrap_or_default();

    json!({
        "headers": headers,
        "context": {
            "session_id": ctx.resolved.session_id,
            "config_source": ctx.resolved.source,
            "client_config": ctx.resolved.config.redacted(),
        },
    })
}

fn masked_headers(headers: &HeaderMap) -> JsonValue {
    let mut map = Map::new();
    for (name, value) in headers {
        let value = value.to_str().unwrap_or("<binary>").to_string();
        map.insert(name.as_str().to_string(), JsonValue::from(value));
    }
    sanitize(JsonValue::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendClientFactory, Connection};
    use crate::session::{BackendConfig, ConfigSource, ResolvedConfig, SessionId};
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use std::sync::Arc;

    struct NoBackend;

    #[async_trait]
    impl BackendClientFactory for NoBackend {
        async fn connect(&self, _config: &BackendConfig) -> Connection {
            Connection::Unavailable("none".into())
        }
    }

    #[tokio::test]
    async fn test_user_agent_info_masks_secrets() {
        let mut headers = HeaderMap::new();
        headers.insert("x-session-id", HeaderValue::from_static("s1"));
        headers.insert("x-backend-password", HeaderValue::from_static("hunter2"));
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        let request = RequestContext::new(headers);

        let ctx = ToolContext {
            resolved: ResolvedConfig {
                config: BackendConfig {
                    password: Some("hunter2".into()),
                    ..Default::default()
                },
                source: ConfigSource::Headers,
                session_id: SessionId::parse("s1"),
            },
            backend: Arc::new(NoBackend),
        };

        let info = request
            .scope(async { dispatch(&ctx, USER_AGENT_INFO, Map::new()) })
            .await
            .unwrap();

        assert_eq!(info["headers"]["x-session-id"], "s1");
        assert_eq!(info["headers"]["x-backend-password"], "***");
        assert_eq!(info["headers"]["authorization"], "***");
        assert_eq!(info["context"]["session_id"], "s1");
        assert_eq!(info["context"]["config_source"], "headers");
        assert_eq!(info["context"]["client_config"]["password"], "***");
        assert!(!info.to_string().contains("hunter2"));
    }
}
