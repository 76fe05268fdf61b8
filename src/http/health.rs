//! Liveness endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::mcp::resources::SERVER_VERSION;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub cached_sessions: usize,
    pub uptime_secs: u64,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK",
        service: "MCP for Splunk",
        version: SERVER_VERSION,
        cached_sessions: state.cache.len(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
