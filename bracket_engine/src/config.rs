//! Generator configuration.

use serde::{Deserialize, Serialize};

use crate::formats::{RoundRobinSchedule, leaderboard::DEFAULT_SPORT};

/// Knobs shared by the format generators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketConfig {
    /// Participants per pool in pool play (default: 4)
    pub pool_size: usize,

    /// Upper bound on bracket-stage slots after pool play (default: 8)
    pub max_bracket_teams: usize,

    /// Swiss round count; derived from the field size when unset
    pub swiss_rounds: Option<u32>,

    /// Round robin scheduler
    pub round_robin_schedule: RoundRobinSchedule,

    /// RNG seed for the Swiss shuffle
    pub seed: Option<u64>,

    /// Leaderboard sport when the caller gives no hint
    pub default_sport: String,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            max_bracket_teams: 8,
            swiss_rounds: None,
            round_robin_schedule: RoundRobinSchedule::Greedy,
            seed: None,
            default_sport: DEFAULT_SPORT.to_string(),
        }
    }
}

impl BracketConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.pool_size == 0 {
            return Err("Pool size must be at least 1".to_string());
        }

        if self.max_bracket_teams < 2 {
            return Err("Bracket stage must hold at least 2 teams".to_string());
        }

        if self.swiss_rounds == Some(0) {
            return Err("Swiss round count must be at least 1".to_string());
        }

        if self.default_sport.trim().is_empty() {
            return Err("Default sport must not be empty".to_string());
        }

        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_swiss_rounds(mut self, rounds: u32) -> Self {
        self.swiss_rounds = Some(rounds);
        self
    }

    pub fn with_round_robin_schedule(mut self, schedule: RoundRobinSchedule) -> Self {
        self.round_robin_schedule = schedule;
        self
    }
}
