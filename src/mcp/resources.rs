//! Static and per-session resources.

use serde_json::{json, Value as JsonValue};

use crate::mcp::error::{McpError, Result};
use crate::session::ResolvedConfig;

pub const HEALTH_STATUS: &str = "health://status";
pub const SERVER_INFO: &str = "info://server";
pub const SESSION_CONFIG: &str = "session://config";

pub const SERVER_NAME: &str = "MCP Server for Splunk";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn list() -> JsonValue {
    json!({
        "resources": [
            {
                "uri": HEALTH_STATUS,
                "name": "health",
                "description": "Liveness of the MCP server",
                "mimeType": "text/plain"
            },
            {
                "uri": SERVER_INFO,
                "name": "server-info",
                "description": "Server information and capabilities",
                "mimeType": "application/json"
            },
            {
                "uri": SESSION_CONFIG,
                "name": "session-config",
                "description": "Backend configuration resolved for the calling session (secrets masked)",
                "mimeType": "application/json"
            }
        ]
    })
}

/// Contents of `uri` for the calling request.
pub fn read(uri: &str, resolved: &ResolvedConfig) -> Result<JsonValue> {
    let (mime, text) = match uri {
        HEALTH_STATUS => ("text/plain", "OK".to_string()),
        SERVER_INFO => ("application/json", server_info().to_string()),
        SESSION_CONFIG => (
            "application/json",
            json!({
                "session_id": resolved.session_id,
                "source": resolved.source,
                "config": resolved.config.redacted(),
            })
            .to_string(),
        ),
        other => return Err(McpError::UnknownResource(other.to_string())),
    };

    Ok(json!({
        "contents": [{ "uri": uri, "mimeType": mime, "text": text }]
    }))
}

fn server_info() -> JsonValue {
    json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "transport": "http",
        "capabilities": ["tools", "resources"],
        "description": "MCP server providing Splunk integration with per-session backend configuration",
        "status": "running",
    })
}
