//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, request scope)
//! - Own the process-wide session cache and hand it to resolver and hook
//! - Sweep expired session configs when a TTL is configured
//! - Bind server to listener and shut down on signal

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::backend::{BackendClientFactory, SplunkClientFactory};
use crate::config::{AdminConfig, ServerConfig};
use crate::http::health::health_check;
use crate::http::middleware::session_context_middleware;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::rpc::{handle_delete, handle_post};
use crate::mcp::McpHandler;
use crate::session::{BackendConfig, ConfigResolver, SessionConfigCache, SessionLifecycle};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: ConfigResolver,
    pub handler: Arc<McpHandler>,
    pub cache: Arc<SessionConfigCache>,
    pub admin: AdminConfig,
    pub started_at: Instant,
}

/// HTTP server for the MCP endpoint.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    cache: Arc<SessionConfigCache>,
}

impl HttpServer {
    /// Create a server talking to Splunk with the given process defaults.
    pub fn new(config: ServerConfig, defaults: BackendConfig) -> Self {
        let backend = Arc::new(SplunkClientFactory::new(Duration::from_secs(
            config.timeouts.backend_secs,
        )));
        Self::with_backend(config, defaults, backend)
    }

    /// Create a server with an explicit backend client factory.
    pub fn with_backend(
        config: ServerConfig,
        defaults: BackendConfig,
        backend: Arc<dyn BackendClientFactory>,
    ) -> Self {
        let cache = Arc::new(match config.session.ttl() {
            Some(ttl) => SessionConfigCache::with_ttl(ttl),
            None => SessionConfigCache::new(),
        });

        let state = AppState {
            resolver: ConfigResolver::new(cache.clone(), defaults),
            handler: Arc::new(McpHandler::new(SessionLifecycle::new(cache.clone()), backend)),
            cache: cache.clone(),
            admin: config.admin.clone(),
            started_at: Instant::now(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            cache,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mcp = Router::new()
            .route("/mcp", post(handle_post).delete(handle_delete))
            .route("/mcp/", post(handle_post).delete(handle_delete))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                session_context_middleware,
            ));

        let mut router = Router::new()
            .route("/health", get(health_check))
            .merge(mcp);

        if config.admin.enabled {
            router = router.merge(admin::router(state.clone()));
        }

        router
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(set_request_id_layer())
    }

    /// The configured router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn cache(&self) -> Arc<SessionConfigCache> {
        self.cache.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let sweeper = self.cache.ttl().map(|ttl| {
            let cache = self.cache.clone();
            let interval = Duration::from_secs(self.config.session.sweep_interval_secs.max(1));
            tracing::info!(ttl_secs = ttl.as_secs(), "Session config TTL enabled");
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                loop {
                    ticker.tick().await;
                    cache.evict_expired();
                }
            })
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
