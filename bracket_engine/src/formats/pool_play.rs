//! Pool play followed by a single elimination bracket stage.

use log::debug;

use crate::bracket::{
    AdvancementRules, BracketError, BracketFormat, BracketResult, BracketStructure, Match,
    MatchIds, ParticipantId, Pool,
};
use crate::standings::TeamRecord;

use super::{
    FormatGenerator, elimination_matches, elimination_rounds, round_robin::round_robin_pairs,
    validate_participants,
};

/// Rounds occupied by pool play before the bracket stage starts
pub const POOL_ROUNDS: u32 = 1;

/// Sequential pools of `pool_size`, then a bracket of TBD slots.
///
/// Every pool plays a full round robin at round 1. The bracket stage takes
/// `min(max_bracket_teams, pool_count * 2)` participants in a tree rounded up
/// to a power of two, so the missing seeds become byes; see
/// [`crate::standings::advance_from_pools`] and
/// [`crate::standings::populate_bracket_stage`] for filling them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolPlay {
    pub pool_size: usize,
    pub max_bracket_teams: usize,
}

impl Default for PoolPlay {
    fn default() -> Self {
        Self {
            pool_size: 4,
            max_bracket_teams: 8,
        }
    }
}

/// `A`..`Z`, then `AA`, `AB`, ...
fn pool_label(mut index: usize) -> String {
    let mut label = String::new();
    loop {
        label.insert(0, char::from(b'A' + (index % 26) as u8));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    label
}

impl FormatGenerator for PoolPlay {
    fn format(&self) -> BracketFormat {
        BracketFormat::PoolPlay
    }

    fn generate(
        &self,
        participants: &[ParticipantId],
        tournament_id: &str,
    ) -> BracketResult<BracketStructure> {
        validate_participants(participants)?;
        if self.pool_size == 0 {
            return Err(BracketError::InvalidPoolSize(self.pool_size));
        }
        if self.max_bracket_teams < 2 {
            return Err(BracketError::InvalidConfig(format!(
                "bracket stage needs at least 2 teams, got {}",
                self.max_bracket_teams
            )));
        }

        let mut ids = MatchIds::default();
        let mut matches = Vec::new();
        let mut pools = Vec::new();

        for (index, members) in participants.chunks(self.pool_size).enumerate() {
            let pool_id = format!("pool-{}", index + 1);
            let pool_matches: Vec<Match> = (1..)
                .zip(round_robin_pairs(members))
                .map(|(position, (a, b))| {
                    Match::scheduled(ids.next_id(), tournament_id, 1, position, a.clone(), b.clone())
                        .with_pool(&pool_id)
                })
                .collect();

            matches.extend(pool_matches.iter().cloned());
            pools.push(Pool {
                id: pool_id,
                name: format!("Pool {}", pool_label(index)),
                participants: members.to_vec(),
                matches: pool_matches,
                standings: members.iter().cloned().map(TeamRecord::new).collect(),
            });
        }

        let bracket_slots = self.max_bracket_teams.min(pools.len() * 2);
        let stage_rounds = elimination_rounds(bracket_slots);
        let stage = elimination_matches(
            vec![(None, None); 1 << (stage_rounds - 1)],
            stage_rounds,
            tournament_id,
            POOL_ROUNDS,
            None,
            &mut ids,
        );
        matches.extend(stage);

        debug!(
            "Pool play for {} participant(s): {} pool(s), {} bracket slot(s)",
            participants.len(),
            pools.len(),
            bracket_slots
        );

        let mut structure =
            BracketStructure::new(self.format(), matches, POOL_ROUNDS + stage_rounds);
        structure.pools = Some(pools);
        structure.advancement_rules = Some(AdvancementRules::default());
        structure.bracket_slots = Some(bracket_slots);
        Ok(structure)
    }
}
