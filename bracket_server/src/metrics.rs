//! Prometheus metrics for bracket generation and request traffic.
//!
//! Metrics are exposed in Prometheus text format by an exporter listening on
//! its own address. Without an installed recorder every call is a no-op, so
//! handlers record unconditionally.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bracket_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::brackets_generated_total("round-robin");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Bracket Metrics
// ============================================================================

/// Increment generated brackets counter for a format tag.
pub fn brackets_generated_total(format: &str) {
    metrics::counter!("brackets_generated_total",
        "format" => format.to_string()
    )
    .increment(1);
}

/// Increment engine errors counter for an error kind.
pub fn bracket_generation_errors_total(kind: &str) {
    metrics::counter!("bracket_generation_errors_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record the match count of a generated bracket.
pub fn bracket_matches(count: usize) {
    metrics::histogram!("bracket_matches").record(count as f64);
}

/// Increment standings computations counter.
pub fn standings_computed_total() {
    metrics::counter!("standings_computed_total").increment(1);
}
