//! Standings: win/loss records, Swiss standings, tiebreakers and advancement.
//!
//! Standings are always recomputed from the full match list. Nothing here is
//! patched incrementally, so correcting a result is just another call.
//!
//! ## Example
//!
//! ```
//! use bracket_engine::bracket::{Match, Tiebreaker};
//! use bracket_engine::standings::{apply_tiebreakers, compute_standings};
//!
//! let matches: Vec<Match> = Vec::new();
//! let standings = compute_standings(&matches);
//! let ranked = apply_tiebreakers(&standings, &matches, &[Tiebreaker::HeadToHead], None);
//! assert!(ranked.is_empty());
//! ```

pub mod advancement;
pub mod calculator;
pub mod models;
pub mod swiss;
pub mod tiebreakers;

pub use advancement::{
    advance_from_pools, advance_from_swiss, bracket_stage_capacity, populate_bracket_stage,
};
pub use calculator::{
    compute_standings, compute_standings_strict, seeded_standings, standings_order,
    validate_matches,
};
pub use models::TeamRecord;
pub use swiss::{SwissRecord, compute_swiss_standings, swiss_order};
pub use tiebreakers::apply_tiebreakers;
