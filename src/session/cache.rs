//! Session → backend config cache.

use dashmap::DashMap;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

use crate::observability::metrics;
use crate::session::config::{BackendConfig, REDACTED};
use crate::session::context::SessionId;

/// A cached snapshot with the time it was stored.
#[derive(Debug, Clone)]
struct CacheEntry {
    config: BackendConfig,
    stored_at: Instant,
}

/// Process-wide map from session id to the last header-derived config.
///
/// Each operation is atomic with respect to the map. Writes replace the
/// whole snapshot; there is no field-level merge.
#[derive(Debug, Default)]
pub struct SessionConfigCache {
    inner: DashMap<SessionId, CacheEntry>,
    ttl: Option<Duration>,
}

impl SessionConfigCache {
    /// Cache whose entries live until explicitly removed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose entries are ignored (and later swept) after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: DashMap::new(),
            ttl: Some(ttl),
        }
    }

    /// Store `config` for `session_id`, replacing any previous snapshot.
    ///
    /// Anonymous session ids are refused: they would make unrelated
    /// requests share state.
    pub fn put(&self, session_id: &SessionId, config: BackendConfig) -> bool {
        if session_id.is_anonymous() || session_id.as_str().is_empty() {
            return false;
        }
        self.inner.insert(
            session_id.clone(),
            CacheEntry {
                config,
                stored_at: Instant::now(),
            },
        );
        metrics::record_cache_size(self.inner.len());
        true
    }

    /// Snapshot stored for `session_id`, if any and not expired.
    pub fn get(&self, session_id: &SessionId) -> Option<BackendConfig> {
        if session_id.is_anonymous() || session_id.as_str().is_empty() {
            return None;
        }
        let entry = self.inner.get(session_id)?;
        if self.is_expired(&entry) {
            return None;
        }
        Some(entry.config.clone())
    }

    /// Drop the entry for `session_id`. Removing an unknown id is a no-op.
    pub fn remove(&self, session_id: &SessionId) -> bool {
        let removed = self.inner.remove(session_id).is_some();
        if removed {
            metrics::record_cache_size(self.inner.len());
        }
        removed
    }

    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.get(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Remove every entry older than the TTL. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        let removed = before.saturating_sub(self.inner.len());
        if removed > 0 {
            metrics::record_cache_size(self.inner.len());
            tracing::debug!(removed, "Evicted expired session configs");
        }
        removed
    }

    /// Per-session view for operators. Secret-looking keys are masked, or
    /// only field names are listed when `include_values` is false.
    pub fn summary(&self, include_values: bool) -> Map<String, Value> {
        let mut summary = Map::new();
        for entry in self.inner.iter() {
            let config = &entry.value().config;
            let view = if include_values {
                sanitize(config.redacted())
            } else {
                Value::from(config.field_names())
            };
            summary.insert(entry.key().to_string(), view);
        }
        summary
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        match self.ttl {
            Some(ttl) => entry.stored_at.elapsed() >= ttl,
            None => false,
        }
    }
}

/// Mask values whose key names a secret.
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let lower = k.to_ascii_lowercase();
                    if ["password", "authorization", "token"]
                        .iter()
                        .any(|s| lower.contains(s))
                    {
                        (k, Value::from(REDACTED))
                    } else {
                        (k, v)
                    }
                })
                .collect(),
        ),
        other => other,
    }
}
