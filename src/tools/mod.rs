//! Tool registry.
//!
//! Tools are thin wrappers: they read the resolved config (and, where
//! useful, the ambient request context) and call the backend boundary.

pub mod context;
pub mod splunk;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use crate::backend::BackendClientFactory;
use crate::mcp::error::{McpError, Result};
use crate::session::ResolvedConfig;

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "get_splunk_health")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// What a tool invocation gets to work with.
#[derive(Clone)]
pub struct ToolContext {
    pub resolved: ResolvedConfig,
    pub backend: Arc<dyn BackendClientFactory>,
}

/// Registry of all available tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    /// Create a new registry with all tools registered.
    pub fn new() -> Self {
        let mut tools = Vec::new();
        tools.extend(context::tools());
        tools.extend(splunk::tools());
        Self { tools }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Dispatch a tool call to the appropriate handler.
    pub async fn dispatch(
        &self,
        ctx: &ToolContext,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        if context::handles(name) {
            context::dispatch(ctx, name, args)
        } else if splunk::handles(name) {
            splunk::dispatch(ctx, name, args).await
        } else {
            Err(McpError::UnknownTool(name.to_string()))
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
