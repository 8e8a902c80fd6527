//! Bracket model: matches, structures, errors and result progression.

pub mod errors;
pub mod models;
pub mod progression;

pub use errors::{BracketError, BracketResult};
pub use models::{
    AdvancementRules, AdvancementType, BracketFormat, BracketSection, BracketStructure, Match,
    MatchStatus, ParticipantId, Pool, Slot, Tiebreaker, TournamentId,
};
pub(crate) use models::MatchIds;
pub use progression::record_result;
