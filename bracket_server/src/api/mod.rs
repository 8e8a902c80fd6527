//! HTTP API for the bracket engine.
//!
//! Every endpoint is a pure computation over its request body: the caller
//! sends the participants or the current bracket and receives the new
//! bracket or standings. The server keeps no tournament state.
//!
//! # Modules
//!
//! - [`brackets`]: Generation, result recording, Swiss pairing, advancement
//! - [`standings`]: Standings over a list of matches
//! - [`request_id`]: Correlation ids, request logging and HTTP metrics
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                       - Server health status
//! POST /api/v1/brackets              - Generate a bracket
//! POST /api/v1/brackets/results      - Record a match result
//! POST /api/v1/brackets/swiss/pair   - Pair the next Swiss round
//! POST /api/v1/brackets/swiss/advance - Seed Swiss qualifiers into an elimination bracket
//! POST /api/v1/brackets/advance      - Advance pool play into the bracket stage
//! POST /api/v1/standings             - Compute standings
//! POST /api/v1/standings/swiss       - Compute Swiss standings
//! ```
//!
//! Engine work runs on Tokio's blocking pool so long computations never
//! stall the async workers.
//!
//! # Errors
//!
//! Engine failures are answered with `{"error": "..."}`: `404` for unknown
//! match ids, `422` for inconsistent match data and `400` otherwise. An
//! engine task that dies answers `500`.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bracket_server::{api::{AppState, create_router}, config::ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_router(AppState::new(ServerConfig::default()));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod brackets;
pub mod request_id;
pub mod standings;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use bracket_engine::{BracketError, BracketResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{config::ServerConfig, logging, metrics};

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the configuration sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Rejection type shared by the handlers
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Status code answering an engine error
pub fn status_for(err: &BracketError) -> StatusCode {
    match err {
        BracketError::MatchNotFound(_) => StatusCode::NOT_FOUND,
        BracketError::InconsistentMatchData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Log, count and convert an engine error into a response
fn engine_error(request_id: &str, operation: &str, err: BracketError) -> ApiError {
    let message = err.to_string();
    metrics::bracket_generation_errors_total(err.kind());
    logging::log_engine_rejection(request_id, operation, err.kind(), &message);
    (status_for(&err), Json(ErrorResponse { error: message }))
}

/// Run an engine computation on the blocking pool.
///
/// Engine errors go through [`engine_error`]; a task that panics answers `500`.
pub(crate) async fn run_engine<T, F>(
    request_id: &str,
    operation: &str,
    job: F,
) -> Result<T, ApiError>
where
    F: FnOnce() -> BracketResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result.map_err(|e| engine_error(request_id, operation, e)),
        Err(join_error) => {
            metrics::bracket_generation_errors_total("task_failed");
            logging::log_engine_failure(request_id, operation, &join_error.to_string());
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            ))
        }
    }
}

/// Reject participant lists over the configured limit
pub(crate) fn check_participant_limit(
    state: &AppState,
    request_id: &str,
    operation: &str,
    count: usize,
) -> Result<(), ApiError> {
    let limit = state.config.max_participants;
    if count <= limit {
        return Ok(());
    }

    let message = format!("Too many participants: limit {limit}, got {count}");
    metrics::bracket_generation_errors_total("too_many_participants");
    logging::log_engine_rejection(request_id, operation, "too_many_participants", &message);
    Err((
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message }),
    ))
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let root_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/brackets", post(brackets::generate))
        .route("/brackets/results", post(brackets::record))
        .route("/brackets/swiss/pair", post(brackets::pair_swiss_round))
        .route("/brackets/swiss/advance", post(brackets::advance_swiss))
        .route("/brackets/advance", post(brackets::advance))
        .route("/standings", post(standings::compute))
        .route("/standings/swiss", post(standings::compute_swiss))
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","version":"0.1.0","uptime_secs":42,"timestamp":"2026-10-16T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let uptime_secs = (now - state.started_at).num_seconds().max(0);

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime_secs,
        "max_participants": state.config.max_participants,
        "timestamp": now.to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
