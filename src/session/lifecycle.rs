//! Session termination handling.
//!
//! # State Transitions (per session cache entry)
//! ```text
//! absent  → present: first header-derived resolve
//! present → present: later header-derived resolve (overwrite)
//! present → absent:  termination notification
//! ```
//! In-flight requests keep whatever config they already resolved.

use serde_json::Value;
use std::sync::Arc;

use crate::observability::metrics;
use crate::session::cache::SessionConfigCache;
use crate::session::context::{RequestContext, SessionId};

/// JSON-RPC methods that end a session.
pub const TERMINATION_METHODS: [&str; 3] = ["session/terminate", "session/end", "session/close"];

pub fn is_termination_method(method: &str) -> bool {
    TERMINATION_METHODS.contains(&method)
}

/// Evicts cached credentials when a session ends.
#[derive(Debug, Clone)]
pub struct SessionLifecycle {
    cache: Arc<SessionConfigCache>,
}

impl SessionLifecycle {
    pub fn new(cache: Arc<SessionConfigCache>) -> Self {
        Self { cache }
    }

    /// Forget `session_id`. Safe to call repeatedly or for unknown ids.
    pub fn terminate(&self, session_id: &SessionId) -> bool {
        if session_id.is_anonymous() {
            return false;
        }
        let removed = self.cache.remove(session_id);
        metrics::record_session_terminated(removed);
        if removed {
            tracing::info!(session = %session_id, "Cleared cached backend config");
        } else {
            tracing::debug!(session = %session_id, "Termination for session with no cached config");
        }
        removed
    }

    /// Terminate the session named by `params`, else the ambient one.
    pub fn terminate_current(&self, params: Option<&Value>) -> SessionId {
        let session_id = explicit_session_id(params)
            .unwrap_or_else(RequestContext::current_session_id);
        self.terminate(&session_id);
        session_id
    }
}

/// `sessionId` / `session_id` carried in the notification params.
fn explicit_session_id(params: Option<&Value>) -> Option<SessionId> {
    let params = params?.as_object()?;
    ["sessionId", "session_id"]
        .iter()
        .filter_map(|key| params.get(*key))
        .filter_map(Value::as_str)
        .map(SessionId::parse)
        .find(|id| !id.is_anonymous())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::config::BackendConfig;
    use crate::session::context::X_SESSION_ID;
    use axum::http::{HeaderMap, HeaderValue};
    use serde_json::json;

    fn setup() -> (Arc<SessionConfigCache>, SessionLifecycle) {
        let cache = Arc::new(SessionConfigCache::new());
        let lifecycle = SessionLifecycle::new(cache.clone());
        (cache, lifecycle)
    }

    fn some_config() -> BackendConfig {
        BackendConfig {
            host: Some("h".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_termination_methods() {
        assert!(is_termination_method("session/terminate"));
        assert!(is_termination_method("session/close"));
        assert!(!is_termination_method("tools/call"));
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let (cache, lifecycle) = setup();
        let s1 = SessionId::parse("s1");
        cache.put(&s1, some_config());

        assert!(lifecycle.terminate(&s1));
        assert!(!lifecycle.terminate(&s1));
        assert!(!lifecycle.terminate(&SessionId::parse("unknown")));
        assert!(!cache.contains(&s1));
    }

    #[test]
    fn test_terminate_leaves_other_sessions() {
        let (cache, lifecycle) = setup();
        cache.put(&SessionId::parse("s1"), some_config());
        cache.put(&SessionId::parse("s2"), some_config());

        lifecycle.terminate(&SessionId::parse("s1"));
        assert!(cache.contains(&SessionId::parse("s2")));
    }

    fn request(session: &'static str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert(X_SESSION_ID, HeaderValue::from_static(session));
        RequestContext::new(headers)
    }

    #[tokio::test]
    async fn test_terminate_current_uses_ambient_session() {
        let (cache, lifecycle) = setup();
        cache.put(&SessionId::parse("s1"), some_config());

        let terminated = request("s1")
            .scope(async { lifecycle.terminate_current(None) })
            .await;

        assert_eq!(terminated.as_str(), "s1");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_explicit_param_overrides_ambient_session() {
        let (cache, lifecycle) = setup();
        cache.put(&SessionId::parse("s1"), some_config());
        cache.put(&SessionId::parse("s2"), some_config());

        let params = json!({ "sessionId": "s2" });
        let terminated = request("s1")
            .scope(async { lifecycle.terminate_current(Some(&params)) })
            .await;

        assert_eq!(terminated.as_str(), "s2");
        assert!(cache.contains(&SessionId::parse("s1")));
        assert!(!cache.contains(&SessionId::parse("s2")));
    }
}
