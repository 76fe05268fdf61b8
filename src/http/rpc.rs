//! `/mcp` endpoint handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::time::Instant;

use crate::http::server::AppState;
use crate::mcp::handler::method_label;
use crate::mcp::{JsonRpcRequest, JsonRpcResponse};
use crate::observability::metrics;
use crate::session::context::MCP_SESSION_ID;
use crate::session::{RequestContext, ResolvedConfig};

/// POST /mcp: one JSON-RPC message.
pub async fn handle_post(
    State(state): State<AppState>,
    Extension(resolved): Extension<ResolvedConfig>,
    body: Bytes,
) -> Response {
    let start = Instant::now();

    let request = match JsonRpcRequest::parse(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting malformed JSON-RPC body");
            metrics::record_request("invalid", "error", start);
            return Json(JsonRpcResponse::from_error(None, e)).into_response();
        }
    };

    let label = method_label(&request.method);
    let is_initialize = request.method == "initialize";
    tracing::info!(method = %request.method, source = %resolved.source, "Handling MCP request");

    let Some(reply) = state.handler.handle(request, &resolved).await else {
        metrics::record_request(label, "accepted", start);
        return StatusCode::ACCEPTED.into_response();
    };

    metrics::record_request(label, if reply.is_error() { "error" } else { "ok" }, start);
    let mut response = Json(reply).into_response();

    if is_initialize {
        let session = if resolved.session_id.is_anonymous() {
            uuid::Uuid::new_v4().to_string()
        } else {
            resolved.session_id.to_string()
        };
        if let Ok(value) = HeaderValue::from_str(&session) {
            response.headers_mut().insert(MCP_SESSION_ID, value);
        }
    }

    response
}

/// DELETE /mcp: end the calling session.
pub async fn handle_delete(State(state): State<AppState>) -> StatusCode {
    let session_id = RequestContext::current_session_id();
    if session_id.is_anonymous() {
        return StatusCode::BAD_REQUEST;
    }
    state.handler.lifecycle().terminate(&session_id);
    StatusCode::NO_CONTENT
}
