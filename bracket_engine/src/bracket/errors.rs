//! Bracket error types.

use thiserror::Error;

/// Errors raised while generating brackets, recording results or ranking participants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketError {
    /// Fewer participants than a format can be built from
    #[error("Invalid participant count: need at least {minimum}, got {actual}")]
    InvalidParticipantCount { minimum: usize, actual: usize },

    /// Format identifier not recognized by the dispatcher
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A match that contradicts the match invariants
    #[error("Inconsistent match data in {match_id}: {reason}")]
    InconsistentMatchData { match_id: String, reason: String },

    /// The same participant was supplied more than once
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    /// Pool size of zero
    #[error("Invalid pool size: {0}")]
    InvalidPoolSize(usize),

    /// Round number outside the structure (or a zero round count)
    #[error("Invalid round count: {0}")]
    InvalidRoundCount(u32),

    /// Match id not present in the structure
    #[error("Match not found: {0}")]
    MatchNotFound(String),

    /// Earlier rounds still have unfinished matches
    #[error("Round {round} not ready: {pending} earlier match(es) still pending")]
    RoundNotReady { round: u32, pending: usize },

    /// More advancing participants than bracket slots
    #[error("Bracket full: {capacity} slot(s), {actual} participant(s)")]
    BracketFull { capacity: usize, actual: usize },

    /// Rejected generator configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BracketError {
    /// Shorthand for an [`BracketError::InconsistentMatchData`] error
    pub fn inconsistent(match_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InconsistentMatchData {
            match_id: match_id.into(),
            reason: reason.into(),
        }
    }

    /// Stable, machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            BracketError::InvalidParticipantCount { .. } => "invalid_participant_count",
            BracketError::UnsupportedFormat(_) => "unsupported_format",
            BracketError::InconsistentMatchData { .. } => "inconsistent_match_data",
            BracketError::DuplicateParticipant(_) => "duplicate_participant",
            BracketError::InvalidPoolSize(_) => "invalid_pool_size",
            BracketError::InvalidRoundCount(_) => "invalid_round_count",
            BracketError::MatchNotFound(_) => "match_not_found",
            BracketError::RoundNotReady { .. } => "round_not_ready",
            BracketError::BracketFull { .. } => "bracket_full",
            BracketError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
