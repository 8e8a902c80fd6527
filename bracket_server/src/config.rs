//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use bracket_engine::{BracketConfig, formats::RoundRobinSchedule};
use std::net::SocketAddr;
use std::str::FromStr;

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default cap on participants accepted by one request
pub const DEFAULT_MAX_PARTICIPANTS: usize = 1024;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus exporter address; no exporter when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Defaults handed to the bracket generators
    pub bracket: BracketConfig,
    /// Largest participant list a request may carry
    pub max_participants: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            metrics_bind: None,
            bracket: BracketConfig::default(),
            max_participants: DEFAULT_MAX_PARTICIPANTS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `metrics_override` - Optional metrics address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        metrics_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(bind_override, metrics_override, |key| {
            std::env::var(key).ok()
        })
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(
        bind_override: Option<SocketAddr>,
        metrics_override: Option<SocketAddr>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let bind = match bind_override {
            Some(addr) => addr,
            None => parse_var::<SocketAddr, _>(&lookup, "SERVER_BIND")?.unwrap_or(defaults.bind),
        };

        let metrics_bind = match metrics_override {
            Some(addr) => Some(addr),
            None => parse_var::<SocketAddr, _>(&lookup, "METRICS_BIND")?,
        };

        let mut bracket = defaults.bracket;
        if let Some(pool_size) = parse_var::<usize, _>(&lookup, "BRACKET_POOL_SIZE")? {
            bracket.pool_size = pool_size;
        }
        if let Some(max_teams) = parse_var::<usize, _>(&lookup, "BRACKET_MAX_TEAMS")? {
            bracket.max_bracket_teams = max_teams;
        }
        if let Some(schedule) = parse_var::<RoundRobinSchedule, _>(&lookup, "BRACKET_ROUND_ROBIN")? {
            bracket.round_robin_schedule = schedule;
        }

        let max_participants = parse_var::<usize, _>(&lookup, "BRACKET_MAX_PARTICIPANTS")?
            .unwrap_or(defaults.max_participants);

        Ok(ServerConfig {
            bind,
            metrics_bind,
            bracket,
            max_participants,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bracket.pool_size == 0 {
            return Err(ConfigError::Invalid {
                var: "BRACKET_POOL_SIZE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.bracket.max_bracket_teams < 2 {
            return Err(ConfigError::Invalid {
                var: "BRACKET_MAX_TEAMS".to_string(),
                reason: "Must be at least 2".to_string(),
            });
        }

        if self.max_participants < 2 {
            return Err(ConfigError::Invalid {
                var: "BRACKET_MAX_PARTICIPANTS".to_string(),
                reason: "Must be at least 2".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server address ({})", self.bind),
            });
        }

        self.bracket
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "BRACKET_*".to_string(),
                reason,
            })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse a variable if present; a present but malformed value is an error
fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("{raw:?}: {e}"),
            }),
    }
}
