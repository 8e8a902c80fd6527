//! Bracket generation and standings server.
//!
//! Serves the bracket engine over HTTP with request correlation ids,
//! structured logging and an optional Prometheus exporter.

use std::net::SocketAddr;

use anyhow::Error;
use bracket_server::{api, config::ServerConfig, logging, metrics};
use ctrlc::set_handler;
use pico_args::Arguments;
use tokio::sync::watch;
use tracing::info;

const HELP: &str = "\
Run the tournament bracket server

USAGE:
  bracket_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address   [default: env SERVER_BIND or 127.0.0.1:8080]
  --metrics    IP:PORT     Prometheus exporter address  [default: env METRICS_BIND, disabled if unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                Server bind address (e.g., 0.0.0.0:8080)
  METRICS_BIND               Prometheus exporter address (e.g., 0.0.0.0:9090)
  BRACKET_POOL_SIZE          Participants per pool in pool play [default: 4]
  BRACKET_MAX_TEAMS          Bracket-stage slots after pool play [default: 8]
  BRACKET_ROUND_ROBIN        Round robin scheduler: greedy or circle [default: greedy]
  BRACKET_MAX_PARTICIPANTS   Largest participant list per request [default: 1024]
  RUST_LOG                   Log filter [default: info,tower_http=warn]
";

struct Args {
    bind: Option<SocketAddr>,
    metrics: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        metrics: pargs.opt_value_from_str("--metrics")?,
    };

    // SIGINT and SIGTERM start a graceful shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    set_handler(move || {
        let _ = shutdown_tx.send(true);
    })?;

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.metrics)?;
    config.validate()?;

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus exporter listening on {}", metrics_bind);
    }

    info!(
        "Generator defaults: pool size {}, bracket stage {} team(s), {} round robin, at most {} participant(s)",
        config.bracket.pool_size,
        config.bracket.max_bracket_teams,
        config.bracket.round_robin_schedule,
        config.max_participants
    );

    let bind = config.bind;
    let app = api::create_router(api::AppState::new(config));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind, e))?;

    info!("Server is running at http://{}. Press Ctrl+C to stop.", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal(mut signal: watch::Receiver<bool>) {
    while !*signal.borrow() {
        if signal.changed().await.is_err() {
            break;
        }
    }
}
