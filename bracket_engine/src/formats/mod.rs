//! Format generators.
//!
//! Every competition format implements [`FormatGenerator`]. [`Generator`]
//! wraps them in one enum with `enum_dispatch`, so the dispatcher picks a
//! format at runtime without boxing.

use enum_dispatch::enum_dispatch;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::HashSet;

use crate::bracket::{
    BracketError, BracketFormat, BracketResult, BracketSection, BracketStructure, Match, MatchIds,
    ParticipantId,
};
use crate::config::BracketConfig;

pub mod double_elimination;
pub mod leaderboard;
pub mod pool_play;
pub mod round_robin;
pub mod seeding;
pub mod single_elimination;
pub mod swiss;

pub use double_elimination::{DoubleElimination, LoserRoute, losers_round_matches, route_loser};
pub use leaderboard::Leaderboard;
pub use pool_play::PoolPlay;
pub use round_robin::{RoundRobin, RoundRobinSchedule};
pub use seeding::{SeededSingleElimination, seeding_order};
pub use single_elimination::{SingleElimination, bye_count};
pub use swiss::{SwissSystem, max_rounds, pair_next_round};

/// Fewest participants any format accepts
pub const MIN_PARTICIPANTS: usize = 2;

/// Builds a [`BracketStructure`] from an ordered participant list
#[enum_dispatch]
pub trait FormatGenerator {
    /// Format tag stamped on generated structures
    fn format(&self) -> BracketFormat;

    /// Generate the full structure.
    ///
    /// Fails with [`BracketError::InvalidParticipantCount`] below two
    /// participants and [`BracketError::DuplicateParticipant`] on repeats.
    fn generate(
        &self,
        participants: &[ParticipantId],
        tournament_id: &str,
    ) -> BracketResult<BracketStructure>;
}

/// One generator per supported format
#[enum_dispatch(FormatGenerator)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generator {
    SingleElimination,
    SeededSingleElimination,
    DoubleElimination,
    PoolPlay,
    RoundRobin,
    SwissSystem,
    Leaderboard,
}

impl Generator {
    /// Configure the generator for `format`.
    ///
    /// Swiss round counts not fixed by the configuration default to
    /// `ceil(log2(n)) + 1`, capped at [`swiss::max_rounds`]. The sport hint
    /// only affects leaderboards.
    pub fn for_format(
        format: BracketFormat,
        participant_count: usize,
        sport_hint: Option<&str>,
        config: &BracketConfig,
    ) -> Self {
        match format {
            BracketFormat::SingleElimination => SingleElimination.into(),
            BracketFormat::SeededSingleElimination => SeededSingleElimination.into(),
            BracketFormat::DoubleElimination => DoubleElimination.into(),
            BracketFormat::PoolPlay => PoolPlay {
                pool_size: config.pool_size,
                max_bracket_teams: config.max_bracket_teams,
            }
            .into(),
            BracketFormat::RoundRobin => RoundRobin {
                schedule: config.round_robin_schedule,
            }
            .into(),
            BracketFormat::SwissSystem => SwissSystem {
                rounds: config.swiss_rounds.unwrap_or_else(|| {
                    (elimination_rounds(participant_count) + 1)
                        .min(swiss::max_rounds(participant_count))
                }),
                seed: config.seed,
            }
            .into(),
            BracketFormat::Leaderboard => Leaderboard {
                sport: sport_hint.map_or_else(|| config.default_sport.clone(), str::to_string),
            }
            .into(),
        }
    }
}

/// Reject short or repeated participant lists
pub fn validate_participants(participants: &[ParticipantId]) -> BracketResult<()> {
    if participants.len() < MIN_PARTICIPANTS {
        return Err(BracketError::InvalidParticipantCount {
            minimum: MIN_PARTICIPANTS,
            actual: participants.len(),
        });
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.as_str()) {
            return Err(BracketError::DuplicateParticipant(participant.clone()));
        }
    }

    Ok(())
}

/// Rounds an elimination tree needs for `n` participants: `ceil(log2(n))`
pub fn elimination_rounds(n: usize) -> u32 {
    let mut rounds = 0;
    let mut size = 1usize;
    while size < n {
        size *= 2;
        rounds += 1;
    }
    rounds
}

/// Seeded RNG, or one seeded from the thread RNG when no seed is given
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Build an elimination tree.
///
/// `round_one` holds the first-round pairings. Rounds `2..=total_rounds`
/// follow as placeholders with `2^(total_rounds - round)` matches each. Round
/// numbers are shifted by `round_offset`.
pub(crate) fn elimination_matches(
    round_one: Vec<(Option<ParticipantId>, Option<ParticipantId>)>,
    total_rounds: u32,
    tournament_id: &str,
    round_offset: u32,
    section: Option<BracketSection>,
    ids: &mut MatchIds,
) -> Vec<Match> {
    let mut matches = Vec::new();

    for (position, (a, b)) in (1..).zip(round_one) {
        let mut m = Match::placeholder(ids.next_id(), tournament_id, round_offset + 1, position);
        m.participant_a = a;
        m.participant_b = b;
        m.bracket_section = section;
        matches.push(m);
    }

    for round in 2..=total_rounds {
        let count = 1u32 << (total_rounds - round);
        for position in 1..=count {
            let mut m =
                Match::placeholder(ids.next_id(), tournament_id, round_offset + round, position);
            m.bracket_section = section;
            matches.push(m);
        }
    }

    matches
}
