//! # Bracket Engine
//!
//! Tournament bracket generation and standings.
//!
//! Given an ordered participant list and a competition format, the engine
//! produces every match, round and (for pool play) pool of the tournament. It
//! then computes standings from recorded results and uses them to advance
//! participants: pool winners into the bracket stage, Swiss pairings round by
//! round, elimination winners (and double elimination losers) into the slots
//! they feed.
//!
//! The engine is synchronous and stateless. Every operation takes its inputs
//! explicitly and returns a new value; the only randomness (Swiss round 1
//! shuffle, coin-flip tiebreaker) accepts a seed.
//!
//! ## Formats
//!
//! | identifier                  | generator                                  |
//! |-----------------------------|--------------------------------------------|
//! | `single-elimination`        | [`formats::SingleElimination`]             |
//! | `single-elimination-seeded` | [`formats::SeededSingleElimination`]       |
//! | `double-elimination`        | [`formats::DoubleElimination`]             |
//! | `pool-play-bracket`         | [`formats::PoolPlay`]                      |
//! | `round-robin`               | [`formats::RoundRobin`]                    |
//! | `swiss-system`              | [`formats::SwissSystem`]                   |
//! | `leaderboard`               | [`formats::Leaderboard`]                   |
//!
//! ## Core Modules
//!
//! - [`bracket`]: Match model, bracket structures, errors and result recording
//! - [`formats`]: One generator per format
//! - [`standings`]: Records, Swiss standings, tiebreakers and advancement
//! - [`dispatcher`]: Format lookup by identifier
//!
//! ## Example
//!
//! ```
//! use bracket_engine::{compute_standings, generate_bracket, record_result};
//!
//! let teams: Vec<String> = ["A", "B", "C", "D"].iter().map(|t| t.to_string()).collect();
//! let bracket = generate_bracket(&teams, "cup", "single-elimination", None).unwrap();
//!
//! let bracket = record_result(bracket, "match-1", 21, 17).unwrap();
//! let standings = compute_standings(&bracket.matches);
//! assert_eq!(standings[0].participant, "A");
//! ```

/// Match model, structures, errors and progression.
pub mod bracket;
pub use bracket::{
    BracketError, BracketFormat, BracketResult, BracketStructure, Match, MatchStatus,
    ParticipantId, record_result,
};

/// Generator configuration.
pub mod config;
pub use config::BracketConfig;

/// Format lookup.
pub mod dispatcher;
pub use dispatcher::{generate_bracket, generate_bracket_with};

/// Format generators.
pub mod formats;
pub use formats::{FormatGenerator, Generator, pair_next_round};

/// Standings and advancement.
pub mod standings;
pub use standings::{
    SwissRecord, TeamRecord, advance_from_pools, advance_from_swiss, apply_tiebreakers,
    compute_standings, compute_standings_strict, compute_swiss_standings, populate_bracket_stage,
};
