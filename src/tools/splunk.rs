//! Backend-facing tools.

use serde_json::{json, Map, Value as JsonValue};

use crate::backend::Connection;
use crate::mcp::error::{McpError, Result};
use crate::tools::{ToolContext, ToolDef};

pub const GET_SPLUNK_HEALTH: &str = "get_splunk_health";
pub const LIST_INDEXES: &str = "list_indexes";

pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            GET_SPLUNK_HEALTH,
            "Check connectivity to the Splunk instance configured for this session.",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolDef::new(
            LIST_INDEXES,
            "List the indexes visible to the configured Splunk user.",
            json!({
                "type": "object",
                "properties": {
                    "count": { "type": "integer", "description": "Maximum number of indexes" }
                }
            }),
        ),
    ]
}

pub fn handles(name: &str) -> bool {
    matches!(name, GET_SPLUNK_HEALTH | LIST_INDEXES)
}

pub async fn dispatch(
    ctx: &ToolContext,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    match name {
        GET_SPLUNK_HEALTH => Ok(health(ctx).await),
        LIST_INDEXES => list_indexes(ctx, args).await,
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}

async fn health(ctx: &ToolContext) -> JsonValue {
    let source = ctx.resolved.source;
    match ctx.backend.connect(&ctx.resolved.config).await {
        Connection::Connected(client) => match client.call("server/info", JsonValue::Null).await {
            Ok(info) => json!({
                "status": "connected",
                "config_source": source,
                "server_info": info,
            }),
            Err(e) => json!({
                "status": "error",
                "config_source": source,
                "error": e.to_string(),
            }),
        },
        Connection::Unavailable(reason) => json!({
            "status": "unavailable",
            "config_source": source,
            "reason": reason,
        }),
    }
}

async fn list_indexes(ctx: &ToolContext, args: Map<String, JsonValue>) -> Result<JsonValue> {
    let mut params = Map::new();
    match args.get("count") {
        None | Some(JsonValue::Null) => {}
        Some(JsonValue::Number(n)) if n.as_u64().is_some() => {
            params.insert("count".into(), JsonValue::Number(n.clone()));
        }
        Some(_) => {
            return Err(McpError::InvalidParams(
                "'count' must be a non-negative integer".to_string(),
            ))
        }
    }

    let client = match ctx.backend.connect(&ctx.resolved.config).await {
        Connection::Connected(client) => client,
        Connection::Unavailable(reason) => {
            return Err(McpError::Backend(format!("Splunk unavailable: {}", reason)))
        }
    };

    let response = client.call("data/indexes", JsonValue::Object(params)).await?;
    let names: Vec<JsonValue> = response
        .get("entry")
        .and_then(JsonValue::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("name").cloned())
                .collect()
        })
        .unwrap_or_default();

    Ok(json!({ "indexes": names, "count": names.len() }))
}
