//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_node_calls_total` (counter): remote node calls by method, outcome
//! - `gateway_rpc_requests_total` (counter): exposed RPC requests by method, outcome
//! - `gateway_broadcasts_total` (counter): broadcast attempts by outcome

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one call against the remote node's query API.
pub fn record_node_call(method: &str, ok: bool) {
    metrics::counter!(
        "gateway_node_calls_total",
        "method" => method.to_string(),
        "outcome" => if ok { "ok" } else { "error" },
    )
    .increment(1);
}

/// Record one request served on the exposed RPC endpoint.
pub fn record_rpc_request(method: &str, ok: bool) {
    metrics::counter!(
        "gateway_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => if ok { "ok" } else { "error" },
    )
    .increment(1);
}

/// Record the terminal outcome of a broadcast attempt.
pub fn record_broadcast(outcome: &'static str) {
    metrics::counter!("gateway_broadcasts_total", "outcome" => outcome).increment(1);
}
