//! Double elimination: winners bracket, losers bracket and a championship match.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bracket::{
    BracketError, BracketFormat, BracketResult, BracketSection, BracketStructure, Match, MatchIds,
    ParticipantId, Slot,
};

use super::{FormatGenerator, elimination_matches, elimination_rounds, validate_participants};

/// Where a winners-bracket loser continues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoserRoute {
    pub section: BracketSection,
    pub round: u32,
    pub position: u32,
    pub slot: Slot,
}

/// Matches in losers round `round` for a winners bracket of `winners_rounds`.
///
/// Odd rounds take `2^(W - ceil(r/2))` matches, even rounds
/// `2^(W - ceil(r/2) - 1)`. A winners bracket of `W` rounds feeds
/// `2(W - 1)` losers rounds; any other round is
/// [`BracketError::InvalidRoundCount`].
pub fn losers_round_matches(winners_rounds: u32, round: u32) -> BracketResult<u32> {
    let losers_rounds = winners_rounds.saturating_sub(1) * 2;
    if round == 0 || round > losers_rounds || winners_rounds > 31 {
        return Err(BracketError::InvalidRoundCount(round));
    }

    let half = round.div_ceil(2);
    let exponent = if round % 2 == 0 {
        winners_rounds - half - 1
    } else {
        winners_rounds - half
    };
    Ok(1 << exponent)
}

/// Route the loser of winners match `(round, position)`.
///
/// Round 1 losers pair up in losers round 1: match `ceil(p/2)`, slot A from odd
/// positions and slot B from even ones. A round `k` loser (k >= 2) drops into
/// losers round `2(k - 1)`, match `p`, slot B. With a single winners round the
/// loser goes straight to championship slot B.
pub fn route_loser(winners_rounds: u32, round: u32, position: u32) -> BracketResult<LoserRoute> {
    if round == 0 || round > winners_rounds {
        return Err(BracketError::InvalidRoundCount(round));
    }
    if position == 0 || position > 1 << (winners_rounds - round) {
        return Err(BracketError::inconsistent(
            format!("winners round {round}"),
            format!("position {position} is outside the bracket"),
        ));
    }

    let route = if winners_rounds == 1 {
        LoserRoute {
            section: BracketSection::Championship,
            round: 1,
            position: 1,
            slot: Slot::B,
        }
    } else if round == 1 {
        LoserRoute {
            section: BracketSection::Losers,
            round: 1,
            position: position.div_ceil(2),
            slot: if position % 2 == 1 { Slot::A } else { Slot::B },
        }
    } else {
        LoserRoute {
            section: BracketSection::Losers,
            round: 2 * (round - 1),
            position,
            slot: Slot::B,
        }
    };

    Ok(route)
}

/// Winners and losers brackets closed by one championship match.
///
/// Losers-bracket and championship matches start as placeholders. Results
/// recorded through [`crate::bracket::record_result`] fill them as winners
/// matches finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleElimination;

impl FormatGenerator for DoubleElimination {
    fn format(&self) -> BracketFormat {
        BracketFormat::DoubleElimination
    }

    fn generate(
        &self,
        participants: &[ParticipantId],
        tournament_id: &str,
    ) -> BracketResult<BracketStructure> {
        validate_participants(participants)?;

        let mut ids = MatchIds::default();
        let winners_rounds = elimination_rounds(participants.len());
        let round_one = participants
            .chunks_exact(2)
            .map(|pair| (Some(pair[0].clone()), Some(pair[1].clone())))
            .collect();
        let mut matches = elimination_matches(
            round_one,
            winners_rounds,
            tournament_id,
            0,
            Some(BracketSection::Winners),
            &mut ids,
        );

        let losers_rounds = (winners_rounds - 1) * 2;
        for round in 1..=losers_rounds {
            for position in 1..=losers_round_matches(winners_rounds, round)? {
                matches.push(
                    Match::placeholder(ids.next_id(), tournament_id, round, position)
                        .with_section(BracketSection::Losers),
                );
            }
        }

        matches.push(
            Match::placeholder(ids.next_id(), tournament_id, 1, 1)
                .with_section(BracketSection::Championship),
        );

        let total_rounds = winners_rounds + losers_rounds + 1;
        debug!(
            "Double elimination for {} participant(s): {} winners, {} losers round(s)",
            participants.len(),
            winners_rounds,
            losers_rounds
        );

        Ok(BracketStructure::new(self.format(), matches, total_rounds))
    }
}
