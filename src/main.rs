//! MCP Server for Splunk
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request (POST /mcp, X-Session-ID, X-Backend-*)
//!         │
//!         ▼
//!     ┌──────────┐   ┌──────────────────────┐   ┌───────────────┐
//!     │  http    │──▶│ session middleware    │──▶│ mcp handler   │──▶ tools / resources
//!     │  layers  │   │ context + resolver    │   │ JSON-RPC      │        │
//!     └──────────┘   └──────────┬───────────┘   └───────┬───────┘        ▼
//!                               │                       │            backend
//!                               ▼                       ▼           (Splunk REST)
//!                      session config cache ◀── termination
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use splunk_mcp_server::config::env::{backend_defaults_from_env, resolve_defaults};
use splunk_mcp_server::config::{load_config, ServerConfig};
use splunk_mcp_server::lifecycle::signals::spawn_signal_handler;
use splunk_mcp_server::observability::{logging, metrics};
use splunk_mcp_server::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "splunk-mcp-server")]
#[command(about = "MCP server for Splunk with per-session backend credentials", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listener port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    apply_listener_overrides(&mut config, args.host.as_deref(), args.port);

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "splunk-mcp-server starting");

    let defaults = resolve_defaults(&config.backend, backend_defaults_from_env());
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        session_ttl_secs = ?config.session.ttl_secs,
        admin_enabled = config.admin.enabled,
        default_fields = ?defaults.field_names(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let signals = spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, defaults);
    server.run(listener, shutdown.subscribe()).await?;

    signals.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}

fn apply_listener_overrides(config: &mut ServerConfig, host: Option<&str>, port: Option<u16>) {
    if host.is_none() && port.is_none() {
        return;
    }
    let (current_host, current_port) = config
        .listener
        .bind_address
        .rsplit_once(':')
        .unwrap_or((config.listener.bind_address.as_str(), "8001"));
    config.listener.bind_address = format!(
        "{}:{}",
        host.unwrap_or(current_host),
        port.map(|p| p.to_string())
            .unwrap_or_else(|| current_port.to_string())
    );
}
