//! JSON-RPC method dispatch.

use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;

use crate::backend::BackendClientFactory;
use crate::mcp::error::{McpError, Result};
use crate::mcp::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::resources::{self, SERVER_NAME, SERVER_VERSION};
use crate::session::lifecycle::{is_termination_method, TERMINATION_METHODS};
use crate::session::{ResolvedConfig, SessionLifecycle};
use crate::tools::{ToolContext, ToolRegistry};

/// MCP protocol version we support.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

const KNOWN_METHODS: [&str; 8] = [
    "initialize",
    "notifications/initialized",
    "ping",
    "tools/list",
    "tools/call",
    "resources/list",
    "resources/read",
    "notifications/cancelled",
];

/// Bounded metric label for a method name.
pub fn method_label(method: &str) -> &'static str {
    KNOWN_METHODS
        .iter()
        .chain(TERMINATION_METHODS.iter())
        .find(|known| **known == method)
        .copied()
        .unwrap_or("other")
}

/// Routes MCP requests to tools, resources and the session lifecycle.
pub struct McpHandler {
    registry: ToolRegistry,
    lifecycle: SessionLifecycle,
    backend: Arc<dyn BackendClientFactory>,
}

impl McpHandler {
    pub fn new(lifecycle: SessionLifecycle, backend: Arc<dyn BackendClientFactory>) -> Self {
        Self {
            registry: ToolRegistry::new(),
            lifecycle,
            backend,
        }
    }

    pub fn lifecycle(&self) -> &SessionLifecycle {
        &self.lifecycle
    }

    /// Handle one request. Notifications yield `None`.
    pub async fn handle(
        &self,
        request: JsonRpcRequest,
        resolved: &ResolvedConfig,
    ) -> Option<JsonRpcResponse> {
        let outcome = self.route(&request, resolved).await;

        if request.is_notification() {
            if let Err(e) = outcome {
                tracing::debug!(method = %request.method, error = %e, "Notification failed");
            }
            return None;
        }

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(err) => {
                tracing::debug!(method = %request.method, error = %err, "Request failed");
                JsonRpcResponse::from_error(request.id, err)
            }
        })
    }

    async fn route(&self, request: &JsonRpcRequest, resolved: &ResolvedConfig) -> Result<JsonValue> {
        match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "notifications/initialized" | "notifications/cancelled" | "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.tools() })),
            "tools/call" => self.call_tool(request.params.as_ref(), resolved).await,
            "resources/list" => Ok(resources::list()),
            "resources/read" => {
                let uri = params_object(request.params.as_ref())?
                    .get("uri")
                    .and_then(JsonValue::as_str)
                    .ok_or_else(|| McpError::InvalidParams("Missing 'uri' in params".to_string()))?;
                resources::read(uri, resolved)
            }
            method if is_termination_method(method) => {
                let session_id = self.lifecycle.terminate_current(request.params.as_ref());
                Ok(json!({ "terminated": session_id }))
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self) -> JsonValue {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        })
    }

    async fn call_tool(
        &self,
        params: Option<&JsonValue>,
        resolved: &ResolvedConfig,
    ) -> Result<JsonValue> {
        let params = params_object(params)?;

        let name = params
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| McpError::InvalidParams("Missing 'name' in params".to_string()))?;

        let arguments = match params.get("arguments") {
            Some(JsonValue::Object(obj)) => obj.clone(),
            Some(JsonValue::Null) | None => Map::new(),
            _ => {
                return Err(McpError::InvalidParams(
                    "'arguments' must be an object".to_string(),
                ))
            }
        };

        let ctx = ToolContext {
            resolved: resolved.clone(),
            backend: self.backend.clone(),
        };

        // MCP tool responses are wrapped in content array
        match self.registry.dispatch(&ctx, name, arguments).await {
            Ok(result) => Ok(tool_result(serde_json::to_string(&result)?, false)),
            Err(McpError::Backend(message)) => Ok(tool_result(message, true)),
            Err(err) => Err(err),
        }
    }
}

fn params_object(params: Option<&JsonValue>) -> Result<&Map<String, JsonValue>> {
    match params {
        Some(JsonValue::Object(obj)) => Ok(obj),
        _ => Err(McpError::InvalidParams("Missing params object".to_string())),
    }
}

fn tool_result(text: String, is_error: bool) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    })
}
