//! Operator endpoints for inspecting and evicting cached session configs.
//!
//! Every route sits behind bearer-token auth keyed on `[admin].api_key`.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/sessions", get(get_sessions))
        .route("/admin/sessions/{session_id}", delete(terminate_session))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
