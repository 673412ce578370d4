//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed requests by method, status
//! - `relay_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - The exporter runs on its own listener, separate from the relay port
//! - Recording with no exporter installed is a no-op, so tests and
//!   metrics-disabled deployments pay nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one relayed request.
pub fn record_relay(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!(
        "relay_requests_total",
        "method" => method.clone(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "relay_request_duration_seconds",
        "method" => method,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}
