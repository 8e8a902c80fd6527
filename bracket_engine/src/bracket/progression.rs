//! Recording results and moving participants through elimination trees.

use log::debug;
use std::cmp::Ordering;

use super::{
    BracketError, BracketFormat, BracketResult, BracketSection, BracketStructure, MatchStatus,
    ParticipantId, Slot,
};
use crate::formats::double_elimination::route_loser;

/// Slot of the next-round match that the winner of `position` feeds
fn feeder_slot(position: u32) -> Slot {
    if position % 2 == 1 { Slot::A } else { Slot::B }
}

/// Index of the elimination match at `(section, round, position)`; pool matches never qualify
fn locate(
    structure: &BracketStructure,
    section: Option<BracketSection>,
    round: u32,
    position: u32,
) -> Option<usize> {
    structure.matches.iter().position(|m| {
        m.pool_id.is_none()
            && m.bracket_section == section
            && m.round == round
            && m.position == position
    })
}

fn place(
    structure: &mut BracketStructure,
    idx: usize,
    slot: Slot,
    participant: ParticipantId,
) -> BracketResult<()> {
    let target = &mut structure.matches[idx];
    if let Some(existing) = target.slot(slot)
        && *existing != participant
    {
        return Err(BracketError::inconsistent(
            &target.id,
            format!("slot already holds {existing}"),
        ));
    }
    *target.slot_mut(slot) = Some(participant);
    Ok(())
}

/// Move the winner of the match at `idx` into the match it feeds.
///
/// Losers-bracket and championship winners stay where they are. The last
/// winners-bracket winner of a double elimination goes to championship slot A.
pub(crate) fn advance_winner(structure: &mut BracketStructure, idx: usize) -> BracketResult<()> {
    let m = &structure.matches[idx];
    let Some(winner) = m.winner.clone() else {
        return Ok(());
    };
    let section = m.bracket_section;
    if matches!(
        section,
        Some(BracketSection::Losers | BracketSection::Championship)
    ) {
        return Ok(());
    }

    let (round, position) = (m.round + 1, m.position.div_ceil(2));
    let slot = feeder_slot(m.position);

    if let Some(next) = locate(structure, section, round, position) {
        place(structure, next, slot, winner)
    } else if section == Some(BracketSection::Winners) {
        let championship = locate(structure, Some(BracketSection::Championship), 1, 1)
            .ok_or_else(|| BracketError::inconsistent(&structure.matches[idx].id, "no championship match"))?;
        place(structure, championship, Slot::A, winner)
    } else {
        Ok(())
    }
}

fn drop_loser(structure: &mut BracketStructure, idx: usize) -> BracketResult<()> {
    let m = &structure.matches[idx];
    let Some(loser) = m.loser().cloned() else {
        return Ok(());
    };
    let winners_rounds = structure
        .section(BracketSection::Winners)
        .map(|w| w.round)
        .max()
        .unwrap_or(0);

    let route = route_loser(winners_rounds, m.round, m.position)?;
    let target = locate(structure, Some(route.section), route.round, route.position).ok_or_else(
        || {
            BracketError::inconsistent(
                &structure.matches[idx].id,
                format!(
                    "no {:?} match at round {} position {}",
                    route.section, route.round, route.position
                ),
            )
        },
    )?;
    place(structure, target, route.slot, loser)
}

/// Record the final score of a match and return the updated structure.
///
/// The higher score wins; equal scores are rejected because no format here
/// can progress a draw. In elimination formats the winner moves to
/// `(round + 1, ceil(position / 2))`, slot A from odd positions and slot B from
/// even ones. Double elimination also drops winners-bracket losers into the
/// losers bracket. Leaderboard entries take `score_a` as the performance.
pub fn record_result(
    mut structure: BracketStructure,
    match_id: &str,
    score_a: i64,
    score_b: i64,
) -> BracketResult<BracketStructure> {
    let idx = structure
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or_else(|| BracketError::MatchNotFound(match_id.to_string()))?;
    let format = structure.format;

    let m = &mut structure.matches[idx];
    if m.is_completed() {
        return Err(BracketError::inconsistent(match_id, "match already completed"));
    }

    let winner = match (&m.participant_a, &m.participant_b) {
        (Some(a), None) if format == BracketFormat::Leaderboard => a.clone(),
        (Some(a), Some(b)) => match score_a.cmp(&score_b) {
            Ordering::Greater => a.clone(),
            Ordering::Less => b.clone(),
            Ordering::Equal => {
                return Err(BracketError::inconsistent(
                    match_id,
                    "tied scores cannot decide a match",
                ));
            }
        },
        _ => {
            return Err(BracketError::inconsistent(
                match_id,
                "both participants must be assigned",
            ));
        }
    };

    m.score_a = score_a;
    m.score_b = score_b;
    m.winner = Some(winner);
    m.status = MatchStatus::Completed;
    let decided = m.clone();

    if let (Some(pools), Some(pool_id)) = (structure.pools.as_mut(), decided.pool_id.as_deref())
        && let Some(copy) = pools
            .iter_mut()
            .filter(|p| p.id == pool_id)
            .flat_map(|p| p.matches.iter_mut())
            .find(|pm| pm.id == decided.id)
    {
        *copy = decided.clone();
    }

    if format.is_elimination() && decided.pool_id.is_none() {
        advance_winner(&mut structure, idx)?;
        if format == BracketFormat::DoubleElimination
            && decided.bracket_section == Some(BracketSection::Winners)
        {
            drop_loser(&mut structure, idx)?;
        }
    }

    debug!(
        "Recorded {} {}-{} in {} bracket, winner {:?}",
        match_id, score_a, score_b, format, decided.winner
    );

    Ok(structure)
}
