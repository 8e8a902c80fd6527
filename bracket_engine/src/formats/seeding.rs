//! Seeded single elimination.

use log::debug;

use crate::bracket::{
    BracketFormat, BracketResult, BracketStructure, MatchIds, MatchStatus, ParticipantId,
    progression,
};

use super::{FormatGenerator, elimination_matches, elimination_rounds, validate_participants};

/// Seed sitting at every slot of a bracket with `size` slots.
///
/// Seed 1 meets the last seed, and the top two seeds can only meet in the
/// final: `[1, 2]`, `[1, 4, 2, 3]`, `[1, 8, 4, 5, 2, 7, 3, 6]`. Sizes are
/// rounded up to a power of two.
pub fn seeding_order(size: usize) -> Vec<usize> {
    if size == 0 {
        return Vec::new();
    }

    let bracket_size = size.next_power_of_two();
    let mut order = vec![1];
    let mut current = 1;
    while current < bracket_size {
        current *= 2;
        order = order
            .into_iter()
            .flat_map(|seed| [seed, current + 1 - seed])
            .collect();
    }
    order
}

/// Knockout bracket in which input order is seed order.
///
/// Missing low seeds become byes: the first-round match is completed with the
/// higher seed as winner, who is already placed in round 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeededSingleElimination;

impl FormatGenerator for SeededSingleElimination {
    fn format(&self) -> BracketFormat {
        BracketFormat::SeededSingleElimination
    }

    fn generate(
        &self,
        participants: &[ParticipantId],
        tournament_id: &str,
    ) -> BracketResult<BracketStructure> {
        validate_participants(participants)?;

        let total_rounds = elimination_rounds(participants.len());
        let slots: Vec<Option<ParticipantId>> = seeding_order(1 << total_rounds)
            .into_iter()
            .map(|seed| participants.get(seed - 1).cloned())
            .collect();
        let round_one = slots
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();

        let mut matches = elimination_matches(
            round_one,
            total_rounds,
            tournament_id,
            0,
            None,
            &mut MatchIds::default(),
        );

        let mut byes = Vec::new();
        for (idx, m) in matches.iter_mut().enumerate() {
            if m.round == 1 && m.participant_b.is_none() {
                m.winner = m.participant_a.clone();
                m.status = MatchStatus::Completed;
                byes.push(idx);
            }
        }

        let mut structure = BracketStructure::new(self.format(), matches, total_rounds);
        for idx in byes {
            progression::advance_winner(&mut structure, idx)?;
        }

        debug!(
            "Seeded single elimination for {} participant(s): {} round(s)",
            participants.len(),
            total_rounds
        );

        Ok(structure)
    }
}
