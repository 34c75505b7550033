//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_invocations_total` (counter): invocations by function, outcome
//! - `edge_invocation_duration_seconds` (histogram): pipeline latency by function
//! - `edge_probe_attempts_total` (counter): origin probe attempts by result
//! - `edge_bridge_requests_total` (counter): bridged HTTP requests by result
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Labels are low-cardinality (no paths, no hosts)

use std::net::SocketAddr;
use std::time::Instant;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one edge function invocation.
pub fn record_invocation(function: &'static str, outcome: &'static str, start: Instant) {
    counter!("edge_invocations_total", "function" => function, "outcome" => outcome).increment(1);
    histogram!("edge_invocation_duration_seconds", "function" => function)
        .record(start.elapsed().as_secs_f64());
}

/// Record one origin probe attempt.
pub fn record_probe_attempt(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("edge_probe_attempts_total", "result" => result).increment(1);
}

/// Record how the bridge answered one HTTP request.
pub fn record_bridge_request(result: &'static str) {
    counter!("edge_bridge_requests_total", "result" => result).increment(1);
}
