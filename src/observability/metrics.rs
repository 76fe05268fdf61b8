//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mcp_requests_total` (counter): JSON-RPC requests by method, outcome
//! - `mcp_request_duration_seconds` (histogram): handling latency by method
//! - `mcp_config_resolutions_total` (counter): resolved configs by source
//! - `mcp_sessions_terminated_total` (counter): terminations, by whether
//!   a cached entry existed
//! - `mcp_session_cache_entries` (gauge): cached session configs

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, outcome: &'static str, start: Instant) {
    let method = method.to_string();
    metrics::counter!("mcp_requests_total", "method" => method.clone(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!("mcp_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_resolution(source: &'static str) {
    metrics::counter!("mcp_config_resolutions_total", "source" => source).increment(1);
}

pub fn record_session_terminated(had_entry: bool) {
    let had_entry = if had_entry { "true" } else { "false" };
    metrics::counter!("mcp_sessions_terminated_total", "had_entry" => had_entry).increment(1);
}

pub fn record_cache_size(size: usize) {
    metrics::gauge!("mcp_session_cache_entries").set(size as f64);
}
