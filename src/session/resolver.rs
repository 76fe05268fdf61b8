//! Backend config resolution for one request.
//!
//! # Order
//! ```text
//! 1. headers of the ambient request   → cache under session id, return
//! 2. session cache (named sessions)   → return
//! 3. process defaults                 → return (possibly empty)
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::observability::metrics;
use crate::session::cache::SessionConfigCache;
use crate::session::config::BackendConfig;
use crate::session::context::{RequestContext, SessionId};
use crate::session::headers::extract_backend_config;

/// Where a resolved config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Headers,
    Session,
    Defaults,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Headers => "headers",
            ConfigSource::Session => "session",
            ConfigSource::Defaults => "defaults",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolution for one request. Never cached itself.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: BackendConfig,
    pub source: ConfigSource,
    pub session_id: SessionId,
}

impl ResolvedConfig {
    /// Nothing was known anywhere; the backend boundary decides what that means.
    pub fn is_unconfigured(&self) -> bool {
        self.config.is_empty()
    }
}

/// Applies the header → session → defaults policy.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    cache: Arc<SessionConfigCache>,
    defaults: Arc<BackendConfig>,
}

impl ConfigResolver {
    pub fn new(cache: Arc<SessionConfigCache>, defaults: BackendConfig) -> Self {
        Self {
            cache,
            defaults: Arc::new(defaults),
        }
    }

    pub fn cache(&self) -> &Arc<SessionConfigCache> {
        &self.cache
    }

    pub fn defaults(&self) -> &BackendConfig {
        &self.defaults
    }

    /// Resolve against the ambient request context.
    ///
    /// Outside any request scope this behaves like an anonymous request
    /// without headers.
    pub fn resolve(&self) -> ResolvedConfig {
        match RequestContext::current() {
            Some(ctx) => self.resolve_for(&ctx),
            None => self.fallback(SessionId::anonymous()),
        }
    }

    /// Resolve for an explicit context.
    pub fn resolve_for(&self, ctx: &RequestContext) -> ResolvedConfig {
        let session_id = ctx.session_id().clone();

        if let Some(config) = extract_backend_config(ctx.headers()) {
            if self.cache.put(&session_id, config.clone()) {
                tracing::debug!(
                    session = %session_id,
                    fields = ?config.field_names(),
                    "Cached header-derived backend config"
                );
            }
            return self.finish(config, ConfigSource::Headers, session_id);
        }

        if let Some(config) = self.cache.get(&session_id) {
            return self.finish(config, ConfigSource::Session, session_id);
        }

        self.fallback(session_id)
    }

    fn fallback(&self, session_id: SessionId) -> ResolvedConfig {
        self.finish(
            self.defaults.as_ref().clone(),
            ConfigSource::Defaults,
            session_id,
        )
    }

    fn finish(
        &self,
        config: BackendConfig,
        source: ConfigSource,
        session_id: SessionId,
    ) -> ResolvedConfig {
        metrics::record_resolution(source.as_str());
        tracing::debug!(
            session = %session_id,
            source = %source,
            fields = ?config.field_names(),
            "Resolved backend config"
        );
        ResolvedConfig {
            config,
            source,
            session_id,
        }
    }
}
