use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::server::AppState;
use crate::session::SessionId;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub cached_sessions: usize,
    pub ttl_secs: Option<u64>,
    pub uptime_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionsQuery {
    /// Include sanitized field values instead of field names only.
    #[serde(default)]
    pub values: bool,
}

#[derive(Serialize)]
pub struct TerminateOutcome {
    pub session_id: String,
    pub removed: bool,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        cached_sessions: state.cache.len(),
        ttl_secs: state.cache.ttl().map(|ttl| ttl.as_secs()),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

pub async fn get_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionsQuery>,
) -> Json<Map<String, Value>> {
    Json(state.cache.summary(query.values))
}

pub async fn terminate_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<TerminateOutcome>, StatusCode> {
    let session_id = SessionId::parse(&session_id);
    if session_id.is_anonymous() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let removed = state.handler.lifecycle().terminate(&session_id);
    Ok(Json(TerminateOutcome {
        session_id: session_id.to_string(),
        removed,
    }))
}
