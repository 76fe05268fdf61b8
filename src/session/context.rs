//! Ambient per-request context.
//!
//! Code running on behalf of an inbound request can ask for the current
//! headers and session id without having them threaded through every call.
//!
//! # Scoping
//! [`RequestContext::scope`] binds the context to one future (tokio
//! task-local). Other tasks on the same worker never see it, and the
//! previous context is back as soon as the future completes, is dropped
//! mid-flight or panics. Tasks spawned from inside a scope start without a
//! context unless they are wrapped in their own `scope`.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Caller-chosen session header.
pub const X_SESSION_ID: &str = "x-session-id";
/// Streamable HTTP transport session header, consulted when the caller
/// header is missing.
pub const MCP_SESSION_ID: &str = "mcp-session-id";

/// Session id of requests that did not name a session.
pub const ANONYMOUS_SESSION: &str = "-";

/// Opaque caller-supplied session identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn anonymous() -> Self {
        SessionId(ANONYMOUS_SESSION.to_string())
    }

    /// Build from a raw value. Empty or "-" values are anonymous; a value
    /// containing commas (repeated header folded by a proxy) keeps only the
    /// part before the first comma.
    pub fn parse(raw: &str) -> Self {
        let first = raw.split(',').next().unwrap_or_default().trim();
        if first.is_empty() {
            Self::anonymous()
        } else {
            SessionId(first.to_string())
        }
    }

    /// Derive the session id for a request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        [X_SESSION_ID, MCP_SESSION_ID]
            .iter()
            .filter_map(|name| headers.get(*name))
            .filter_map(|value| value.to_str().ok())
            .map(SessionId::parse)
            .find(|id| !id.is_anonymous())
            .unwrap_or_else(SessionId::anonymous)
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_SESSION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

/// Headers and session id of the request being served.
#[derive(Clone, Debug)]
pub struct RequestContext {
    headers: Arc<HeaderMap>,
    session_id: SessionId,
}

tokio::task_local! {
    static CURRENT: RequestContext;
}

impl RequestContext {
    /// Capture the headers of one request.
    pub fn new(headers: HeaderMap) -> Self {
        let session_id = SessionId::from_headers(&headers);
        Self {
            headers: Arc::new(headers),
            session_id,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Run `fut` with this context as the ambient one.
    ///
    /// The previous context is visible again once `fut` completes, is
    /// dropped, or panics.
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, fut).await
    }

    /// The ambient context, if any. The innermost `scope` wins.
    pub fn current() -> Option<RequestContext> {
        CURRENT.try_with(Clone::clone).ok()
    }

    /// The ambient session id, or the anonymous one.
    pub fn current_session_id() -> SessionId {
        Self::current()
            .map(|ctx| ctx.session_id)
            .unwrap_or_else(SessionId::anonymous)
    }
}
