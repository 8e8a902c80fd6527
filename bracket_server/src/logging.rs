//! Structured logging configuration.
//!
//! Log levels are read from `RUST_LOG`; without it the server logs at `info`
//! and keeps `tower_http` quiet.

use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// Requests slower than this are logged at `warn`
const SLOW_REQUEST: Duration = Duration::from_millis(500);

/// Initialize structured logging
///
/// # Example
///
/// ```no_run
/// use bracket_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a finished request with its correlation id
pub fn log_request_completed(
    request_id: &str,
    method: &str,
    path: &str,
    status: u16,
    elapsed: Duration,
) {
    let duration_ms = elapsed.as_millis() as u64;
    if elapsed > SLOW_REQUEST {
        tracing::warn!(
            request_id = request_id,
            http_method = method,
            http_path = path,
            http_status = status,
            duration_ms = duration_ms,
            "Slow request"
        );
    } else {
        tracing::info!(
            request_id = request_id,
            http_method = method,
            http_path = path,
            http_status = status,
            duration_ms = duration_ms,
            "Request completed"
        );
    }
}

/// Log a rejected engine operation
pub fn log_engine_rejection(request_id: &str, operation: &str, kind: &str, message: &str) {
    tracing::warn!(
        request_id = request_id,
        operation = operation,
        kind = kind,
        "Rejected: {}",
        message
    );
}

/// Log an engine task that never produced a result
pub fn log_engine_failure(request_id: &str, operation: &str, error: &str) {
    tracing::error!(
        request_id = request_id,
        operation = operation,
        "Engine task failed: {}",
        error
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_log_request_completed() {
        // Just ensure it doesn't panic
        log_request_completed(
            "req-1",
            "POST",
            "/api/v1/brackets",
            200,
            Duration::from_millis(3),
        );
        log_request_completed("req-2", "POST", "/api/v1/standings", 400, Duration::from_secs(2));
    }

    #[test]
    fn test_log_engine_rejection() {
        log_engine_rejection("req-3", "generate", "unsupported_format", "Unsupported format: chess");
    }

    #[test]
    fn test_log_engine_failure() {
        log_engine_failure("req-4", "pair_next_round", "task panicked");
    }
}
