//! Advancement out of pool play and Swiss rounds into a bracket stage.

use log::{debug, info};
use std::collections::HashSet;

use crate::bracket::{
    AdvancementType, BracketError, BracketFormat, BracketResult, BracketStructure, Match,
    MatchStatus, ParticipantId, progression,
};
use crate::formats::{MIN_PARTICIPANTS, seeded_rng, seeding::seeding_order, validate_participants};

use super::{
    calculator::seeded_standings, models::TeamRecord, swiss::compute_swiss_standings,
    tiebreakers::rank_with,
};

/// Winners advancing per pool when the rules give no count
const DEFAULT_POOL_WINNERS: u32 = 2;

/// Wins needed when a points threshold carries no value
const DEFAULT_THRESHOLD: u32 = 1;

/// Index of the first bracket-stage round and the matches in it
fn bracket_stage(structure: &BracketStructure) -> Option<(u32, Vec<usize>)> {
    let first_round = structure
        .matches
        .iter()
        .filter(|m| m.pool_id.is_none())
        .map(|m| m.round)
        .min()?;

    Some((first_round, stage_round(structure, first_round)))
}

/// Bracket-stage matches of one round, in position order
fn stage_round(structure: &BracketStructure, round: u32) -> Vec<usize> {
    let mut indices: Vec<usize> = structure
        .matches
        .iter()
        .enumerate()
        .filter(|(_, m)| m.pool_id.is_none() && m.round == round)
        .map(|(idx, _)| idx)
        .collect();
    indices.sort_by_key(|&idx| structure.matches[idx].position);
    indices
}

/// Number of participants the bracket stage takes.
///
/// The stage tree holds two per first-round match; a structure that records
/// fewer intended slots takes only those.
pub fn bracket_stage_capacity(structure: &BracketStructure) -> usize {
    let tree = bracket_stage(structure).map_or(0, |(_, indices)| indices.len() * 2);
    structure.bracket_slots.map_or(tree, |slots| slots.min(tree))
}

/// Select the participants leaving pool play, best first.
///
/// Each pool is ranked from its own matches with the structure's tiebreakers.
/// Pool winners and points thresholds interleave the pools by place (every pool
/// winner, then every runner-up). Top teams rank all pool members together.
/// Wildcards then add the best of the rest, ranked across all pools. The list
/// never exceeds the bracket-stage capacity.
pub fn advance_from_pools(
    structure: &BracketStructure,
    seed: Option<u64>,
) -> BracketResult<Vec<ParticipantId>> {
    let pools = structure
        .pools
        .as_ref()
        .ok_or_else(|| BracketError::UnsupportedFormat(structure.format.to_string()))?;
    let rules = structure.advancement_rules.clone().unwrap_or_default();
    let capacity = bracket_stage_capacity(structure);
    let mut rng = seeded_rng(seed);

    let mut pool_rankings: Vec<Vec<TeamRecord>> = Vec::with_capacity(pools.len());
    for pool in pools {
        let pool_matches: Vec<Match> = structure
            .matches
            .iter()
            .filter(|m| m.pool_id.as_deref() == Some(pool.id.as_str()))
            .cloned()
            .collect();
        let standings = seeded_standings(&pool.participants, &pool_matches);
        pool_rankings.push(rank_with(standings, &pool_matches, &rules.tiebreakers, &mut rng));
    }
    let all_pool_matches: Vec<Match> = structure
        .matches
        .iter()
        .filter(|m| m.pool_id.is_some())
        .cloned()
        .collect();

    let mut advancing: Vec<ParticipantId> = match rules.advancement_type {
        AdvancementType::PoolWinners => {
            let per_pool = rules.count.unwrap_or(DEFAULT_POOL_WINNERS) as usize;
            by_place(&pool_rankings, per_pool, |_| true)
        }
        AdvancementType::PointsThreshold => {
            let threshold = rules.threshold.unwrap_or(DEFAULT_THRESHOLD);
            let deepest = pool_rankings.iter().map(Vec::len).max().unwrap_or(0);
            by_place(&pool_rankings, deepest, |r| r.wins >= threshold)
        }
        AdvancementType::TopTeams => {
            let count = rules.count.map_or(capacity, |c| c as usize);
            let everyone = pool_rankings.iter().flatten().cloned().collect();
            rank_with(everyone, &all_pool_matches, &rules.tiebreakers, &mut rng)
                .into_iter()
                .take(count)
                .map(|r| r.participant)
                .collect()
        }
    };

    if let Some(wildcards) = rules.wildcards.filter(|&w| w > 0) {
        let chosen: HashSet<&str> = advancing.iter().map(String::as_str).collect();
        let rest: Vec<TeamRecord> = pool_rankings
            .iter()
            .flatten()
            .filter(|r| !chosen.contains(r.participant.as_str()))
            .cloned()
            .collect();
        let picked: Vec<ParticipantId> =
            rank_with(rest, &all_pool_matches, &rules.tiebreakers, &mut rng)
                .into_iter()
                .take(wildcards as usize)
                .map(|r| r.participant)
                .collect();
        debug!("{} wildcard(s) advancing: {:?}", picked.len(), picked);
        advancing.extend(picked);
    }

    if advancing.len() > capacity {
        debug!(
            "Truncating {} advancing participant(s) to {} bracket slot(s)",
            advancing.len(),
            capacity
        );
        advancing.truncate(capacity);
    }

    Ok(advancing)
}

fn by_place(
    pool_rankings: &[Vec<TeamRecord>],
    places: usize,
    qualifies: impl Fn(&TeamRecord) -> bool,
) -> Vec<ParticipantId> {
    (0..places)
        .flat_map(|place| pool_rankings.iter().filter_map(move |ranking| ranking.get(place)))
        .filter(|r| qualifies(r))
        .map(|r| r.participant.clone())
        .collect()
}

/// Qualifiers of a finished Swiss event, best first.
///
/// Participants are ranked by Swiss standings (points, Buchholz, game points,
/// strength of schedule) and the top `count` come back in seed order, ready
/// for a seeded elimination bracket. Every match must be completed.
pub fn advance_from_swiss(
    structure: &BracketStructure,
    participants: &[ParticipantId],
    count: usize,
) -> BracketResult<Vec<ParticipantId>> {
    if structure.format != BracketFormat::SwissSystem {
        return Err(BracketError::UnsupportedFormat(structure.format.to_string()));
    }
    validate_participants(participants)?;
    if count < MIN_PARTICIPANTS || count > participants.len() {
        return Err(BracketError::InvalidConfig(format!(
            "cannot advance {count} of {} participant(s)",
            participants.len()
        )));
    }

    let pending = structure.matches.iter().filter(|m| !m.is_completed()).count();
    if pending > 0 {
        return Err(BracketError::RoundNotReady {
            round: structure.total_rounds + 1,
            pending,
        });
    }

    let entered: HashSet<&str> = participants.iter().map(String::as_str).collect();
    let advancing: Vec<ParticipantId> = compute_swiss_standings(participants, &structure.matches)
        .into_iter()
        .filter(|r| entered.contains(r.participant.as_str()))
        .take(count)
        .map(|r| r.participant)
        .collect();

    info!(
        "{} of {} Swiss participant(s) advancing",
        advancing.len(),
        participants.len()
    );
    Ok(advancing)
}

/// Place advancing participants (best first) into the first bracket-stage round.
///
/// Seeds sit in standard bracket order, so the best seed meets the worst and
/// the missing seeds of a partly filled tree are the lowest ones. A stage match
/// left with one participant becomes a completed bye whose winner moves on at
/// once. Byes keep propagating until every remaining match can be played.
pub fn populate_bracket_stage(
    mut structure: BracketStructure,
    advancing: &[ParticipantId],
) -> BracketResult<BracketStructure> {
    let (first_round, indices) = bracket_stage(&structure)
        .ok_or_else(|| BracketError::UnsupportedFormat(structure.format.to_string()))?;

    let capacity = bracket_stage_capacity(&structure);
    if advancing.len() > capacity {
        return Err(BracketError::BracketFull {
            capacity,
            actual: advancing.len(),
        });
    }

    if let Some(&taken) = indices.iter().find(|&&idx| !structure.matches[idx].is_placeholder()) {
        return Err(BracketError::inconsistent(
            &structure.matches[taken].id,
            "bracket stage already populated",
        ));
    }

    for (slot_index, seed) in seeding_order(indices.len() * 2).into_iter().enumerate() {
        let Some(participant) = advancing.get(seed - 1) else {
            continue;
        };
        let m = &mut structure.matches[indices[slot_index / 2]];
        let slot = if slot_index % 2 == 0 {
            &mut m.participant_a
        } else {
            &mut m.participant_b
        };
        *slot = Some(participant.clone());
    }

    let last_round = structure
        .matches
        .iter()
        .filter(|m| m.pool_id.is_none())
        .map(|m| m.round)
        .max()
        .unwrap_or(first_round);

    // Matches that will never receive a participant, as (round, position)
    let mut empty: HashSet<(u32, u32)> = HashSet::new();
    let mut byes = 0;
    for round in first_round..=last_round {
        for idx in stage_round(&structure, round) {
            let m = &structure.matches[idx];
            let position = m.position;
            let starved = |feeder: u32| round == first_round || empty.contains(&(round - 1, feeder));
            let a_dead = m.participant_a.is_none() && starved(2 * position - 1);
            let b_dead = m.participant_b.is_none() && starved(2 * position);

            match (a_dead, b_dead) {
                (true, true) => {
                    empty.insert((round, position));
                }
                (true, false) | (false, true) if !m.is_completed() => {
                    let m = &mut structure.matches[idx];
                    if m.participant_a.is_none() {
                        m.participant_a = m.participant_b.take();
                    }
                    if m.participant_a.is_none() {
                        continue;
                    }
                    m.winner = m.participant_a.clone();
                    m.status = MatchStatus::Completed;
                    progression::advance_winner(&mut structure, idx)?;
                    byes += 1;
                }
                _ => {}
            }
        }
    }

    info!(
        "Populated bracket stage round {} with {} participant(s), {} bye(s)",
        first_round,
        advancing.len(),
        byes
    );

    Ok(structure)
}
