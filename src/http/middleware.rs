//! Request scope middleware.
//!
//! Captures the inbound headers, derives the session id, makes both ambient
//! for the rest of the request and attaches the resolved backend config to
//! the request extensions. The scope is left when the inner service
//! finishes, fails or is dropped.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::logging;
use crate::session::RequestContext;

pub async fn session_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = RequestContext::new(request.headers().clone());
    let span = logging::request_span(
        context.session_id().as_str(),
        request_id(request.headers()),
    );

    let resolver = state.resolver.clone();
    context
        .scope(async move {
            tracing::debug!(
                path = %request.uri().path(),
                headers = ?request.headers().keys().map(|k| k.as_str()).collect::<Vec<_>>(),
                "Captured request headers"
            );

            let resolved = resolver.resolve();
            request.extensions_mut().insert(resolved);
            next.run(request).await
        })
        .instrument(span)
        .await
}
