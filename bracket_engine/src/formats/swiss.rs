//! Swiss system: a fixed number of rounds, pairing participants with similar records.

use log::{debug, warn};
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::bracket::{
    BracketError, BracketFormat, BracketResult, BracketStructure, Match, MatchIds, ParticipantId,
};
use crate::standings::compute_swiss_standings;

use super::{FormatGenerator, seeded_rng, validate_participants};

/// Candidate checks the rematch-free pairing may make before giving up
const MAX_PAIRING_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwissSystem {
    pub rounds: u32,
    /// Seed for the round 1 shuffle
    pub seed: Option<u64>,
}

/// Most rounds a field can play without anyone meeting twice.
///
/// `n - 1` for an even field and `n` for an odd one, where everyone also
/// sits out once.
pub fn max_rounds(participant_count: usize) -> u32 {
    let rounds = if participant_count % 2 == 0 {
        participant_count.saturating_sub(1)
    } else {
        participant_count
    };
    u32::try_from(rounds).unwrap_or(u32::MAX)
}

impl FormatGenerator for SwissSystem {
    fn format(&self) -> BracketFormat {
        BracketFormat::SwissSystem
    }

    /// Round 1 pairs a shuffled field; later rounds are placeholders filled by
    /// [`pair_next_round`]. An odd participant out sits the round out.
    fn generate(
        &self,
        participants: &[ParticipantId],
        tournament_id: &str,
    ) -> BracketResult<BracketStructure> {
        validate_participants(participants)?;
        if self.rounds == 0 || self.rounds > max_rounds(participants.len()) {
            return Err(BracketError::InvalidRoundCount(self.rounds));
        }

        let mut shuffled = participants.to_vec();
        shuffled.shuffle(&mut seeded_rng(self.seed));

        let mut ids = MatchIds::default();
        let mut matches: Vec<Match> = (1..)
            .zip(shuffled.chunks_exact(2))
            .map(|(position, pair)| {
                Match::scheduled(
                    ids.next_id(),
                    tournament_id,
                    1,
                    position,
                    pair[0].clone(),
                    pair[1].clone(),
                )
            })
            .collect();

        let per_round = (participants.len() / 2) as u32;
        for round in 2..=self.rounds {
            for position in 1..=per_round {
                matches.push(Match::placeholder(ids.next_id(), tournament_id, round, position));
            }
        }

        debug!(
            "Swiss system for {} participant(s): {} round(s)",
            participants.len(),
            self.rounds
        );

        Ok(BracketStructure::new(self.format(), matches, self.rounds))
    }
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Whether every component of the "not met yet" graph has an even size.
///
/// An odd component can never be split into fresh pairs.
fn components_are_even(ranking: &[&str], met: &HashSet<(&str, &str)>) -> bool {
    fn root(parent: &mut [usize], mut node: usize) -> usize {
        while parent[node] != node {
            parent[node] = parent[parent[node]];
            node = parent[node];
        }
        node
    }

    let mut parent: Vec<usize> = (0..ranking.len()).collect();
    for i in 0..ranking.len() {
        for j in i + 1..ranking.len() {
            if !met.contains(&pair_key(ranking[i], ranking[j])) {
                let (a, b) = (root(&mut parent, i), root(&mut parent, j));
                parent[a] = b;
            }
        }
    }

    let mut sizes = vec![0usize; ranking.len()];
    for node in 0..ranking.len() {
        sizes[root(&mut parent, node)] += 1;
    }
    sizes.iter().all(|size| size % 2 == 0)
}

/// Pair top-down, each participant with the best-ranked opponent it has not met.
///
/// Backtracks when a choice leaves the rest unpairable, for at most
/// [`MAX_PAIRING_STEPS`] candidate checks. `None` means no rematch-free pairing exists or
/// none was found within the budget.
fn pair_without_rematches<'a>(
    ranking: &[&'a str],
    met: &HashSet<(&str, &str)>,
) -> Option<Vec<(&'a str, &'a str)>> {
    fn backtrack<'a>(
        unpaired: &mut Vec<&'a str>,
        met: &HashSet<(&str, &str)>,
        pairs: &mut Vec<(&'a str, &'a str)>,
        steps: &mut usize,
    ) -> bool {
        if unpaired.is_empty() {
            return true;
        }

        let first = unpaired.remove(0);
        for i in 0..unpaired.len() {
            *steps += 1;
            if *steps > MAX_PAIRING_STEPS {
                break;
            }
            let candidate = unpaired[i];
            if met.contains(&pair_key(first, candidate)) {
                continue;
            }

            unpaired.remove(i);
            pairs.push((first, candidate));
            if backtrack(unpaired, met, pairs, steps) {
                return true;
            }
            pairs.pop();
            unpaired.insert(i, candidate);
        }
        unpaired.insert(0, first);
        false
    }

    if !components_are_even(ranking, met) {
        return None;
    }

    let mut unpaired = ranking.to_vec();
    let mut pairs = Vec::with_capacity(ranking.len() / 2);
    let mut steps = 0;
    let found = backtrack(&mut unpaired, met, &mut pairs, &mut steps);
    if !found && steps > MAX_PAIRING_STEPS {
        debug!("Rematch-free pairing search gave up after {MAX_PAIRING_STEPS} check(s)");
    }
    found.then_some(pairs)
}

/// Pair top-down, preferring the best-ranked opponent not met yet and
/// otherwise the best-ranked one left
fn pair_fewest_rematches<'a>(
    ranking: &[&'a str],
    met: &HashSet<(&str, &str)>,
) -> Vec<(&'a str, &'a str)> {
    let mut unpaired = ranking.to_vec();
    let mut pairs = Vec::with_capacity(ranking.len() / 2);
    while unpaired.len() >= 2 {
        let first = unpaired.remove(0);
        let opponent = unpaired
            .iter()
            .position(|candidate| !met.contains(&pair_key(first, candidate)))
            .unwrap_or(0);
        pairs.push((first, unpaired.remove(opponent)));
    }
    pairs
}

/// Fill the placeholder matches of `round` from the standings so far.
///
/// Every earlier match must be completed. Participants are ranked by Swiss
/// standings (points, Buchholz, game points, strength of schedule; unplayed
/// ones keep their order in `participants`). With an odd field the
/// lowest-ranked participant without a previous bye sits out. The rest pair
/// top-down without rematches; only when that is impossible (or the search
/// runs out of steps) are rematches allowed, as few as a greedy pass manages.
pub fn pair_next_round(
    mut structure: BracketStructure,
    participants: &[ParticipantId],
    round: u32,
) -> BracketResult<BracketStructure> {
    if structure.format != BracketFormat::SwissSystem {
        return Err(BracketError::UnsupportedFormat(structure.format.to_string()));
    }
    if round < 2 || round > structure.total_rounds {
        return Err(BracketError::InvalidRoundCount(round));
    }
    validate_participants(participants)?;

    let pending = structure
        .matches
        .iter()
        .filter(|m| m.round < round && !m.is_completed())
        .count();
    if pending > 0 {
        return Err(BracketError::RoundNotReady { round, pending });
    }

    let targets: Vec<usize> = structure
        .matches
        .iter()
        .enumerate()
        .filter(|(_, m)| m.round == round)
        .map(|(idx, _)| idx)
        .collect();
    if let Some(&paired) = targets.iter().find(|&&idx| !structure.matches[idx].is_placeholder()) {
        return Err(BracketError::inconsistent(
            &structure.matches[paired].id,
            "round already paired",
        ));
    }

    let pairs: Vec<(ParticipantId, ParticipantId)> = {
        let earlier: Vec<Match> = structure
            .matches
            .iter()
            .filter(|m| m.round < round)
            .cloned()
            .collect();

        let mut met = HashSet::new();
        for m in &earlier {
            if let (Some(a), Some(b)) = (&m.participant_a, &m.participant_b) {
                met.insert(pair_key(a, b));
            }
        }

        let had_bye: HashSet<&str> = (1..round)
            .flat_map(|r| {
                let earlier = &earlier;
                participants
                    .iter()
                    .filter(move |p| !earlier.iter().any(|m| m.round == r && m.involves(p)))
            })
            .map(String::as_str)
            .collect();

        let entered: HashSet<&str> = participants.iter().map(String::as_str).collect();
        let standings = compute_swiss_standings(participants, &earlier);
        let mut ranking: Vec<&str> = standings
            .iter()
            .map(|r| r.participant.as_str())
            .filter(|p| entered.contains(p))
            .collect();

        if ranking.len() % 2 == 1 {
            let bye_idx = ranking
                .iter()
                .rposition(|p| !had_bye.contains(p))
                .unwrap_or(ranking.len() - 1);
            let bye = ranking.remove(bye_idx);
            debug!("Swiss round {}: bye for {}", round, bye);
        }

        let pairs = pair_without_rematches(&ranking, &met).unwrap_or_else(|| {
            warn!("Swiss round {round}: no rematch-free pairing found, allowing rematches");
            pair_fewest_rematches(&ranking, &met)
        });
        pairs
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    };

    if pairs.len() != targets.len() {
        return Err(BracketError::inconsistent(
            format!("round-{round}"),
            format!("{} pairing(s) for {} match(es)", pairs.len(), targets.len()),
        ));
    }

    for (idx, (a, b)) in targets.into_iter().zip(pairs) {
        let m = &mut structure.matches[idx];
        m.participant_a = Some(a);
        m.participant_b = Some(b);
    }

    debug!("Paired Swiss round {round}");
    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{MatchStatus, record_result};
    use std::time::{Duration, Instant};

    fn players(n: usize) -> Vec<ParticipantId> {
        (1..=n).map(|i| format!("P{i}")).collect()
    }

    fn swiss(rounds: u32) -> SwissSystem {
        SwissSystem {
            rounds,
            seed: Some(42),
        }
    }

    /// Complete a round, the participant listed first always winning
    fn play_round(mut structure: BracketStructure, round: u32) -> BracketStructure {
        let ids: Vec<String> = structure.round(round).map(|m| m.id.clone()).collect();
        for id in ids {
            structure = record_result(structure, &id, 2, 1).unwrap();
        }
        structure
    }

    #[test]
    fn test_generate_structure() {
        let structure = swiss(4).generate(&players(8), "t").unwrap();

        assert_eq!(structure.total_rounds, 4);
        assert_eq!(structure.total_matches, 16);
        assert_eq!(structure.round(1).count(), 4);
        assert!(structure.round(1).all(|m| !m.is_placeholder()));
        assert!(structure.round(3).all(|m| m.is_placeholder()));
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = swiss(3).generate(&players(10), "t").unwrap();
        let b = swiss(3).generate(&players(10), "t").unwrap();
        assert_eq!(a, b);

        let mut seen: Vec<&str> = a
            .round(1)
            .flat_map(|m| [m.participant_a.as_deref(), m.participant_b.as_deref()])
            .flatten()
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<String> = players(10);
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert_eq!(
            swiss(0).generate(&players(4), "t").unwrap_err(),
            BracketError::InvalidRoundCount(0)
        );
    }

    #[test]
    fn test_max_rounds() {
        assert_eq!(max_rounds(2), 1);
        assert_eq!(max_rounds(4), 3);
        assert_eq!(max_rounds(5), 5);
    }

    #[test]
    fn test_more_rounds_than_opponents_rejected() {
        assert_eq!(
            swiss(4).generate(&players(4), "t").unwrap_err(),
            BracketError::InvalidRoundCount(4)
        );
        assert_eq!(
            swiss(u32::MAX).generate(&players(8), "t").unwrap_err(),
            BracketError::InvalidRoundCount(u32::MAX)
        );
        assert!(swiss(5).generate(&players(5), "t").is_ok());
    }

    #[test]
    fn test_pairing_needs_finished_rounds() {
        let structure = swiss(3).generate(&players(4), "t").unwrap();
        let err = pair_next_round(structure, &players(4), 2).unwrap_err();
        assert_eq!(
            err,
            BracketError::RoundNotReady {
                round: 2,
                pending: 2
            }
        );
    }

    #[test]
    fn test_pairing_avoids_rematches() {
        let participants = players(8);
        let mut structure = swiss(3).generate(&participants, "t").unwrap();

        for round in 2..=3 {
            structure = play_round(structure, round - 1);
            structure = pair_next_round(structure, &participants, round).unwrap();
        }

        let mut met = HashSet::new();
        for m in &structure.matches {
            let a = m.participant_a.as_deref().unwrap();
            let b = m.participant_b.as_deref().unwrap();
            assert!(met.insert(pair_key(a, b)), "rematch between {a} and {b}");
        }
    }

    #[test]
    fn test_round_two_pairs_winners_together() {
        let participants = players(8);
        let structure = swiss(3).generate(&participants, "t").unwrap();
        let winners: HashSet<String> = structure
            .round(1)
            .filter_map(|m| m.participant_a.clone())
            .collect();

        let structure = play_round(structure, 1);
        let structure = pair_next_round(structure, &participants, 2).unwrap();

        for m in structure.round(2) {
            let a_won = winners.contains(m.participant_a.as_ref().unwrap());
            let b_won = winners.contains(m.participant_b.as_ref().unwrap());
            assert_eq!(a_won, b_won);
        }
    }

    #[test]
    fn test_odd_field_never_repeats_a_bye() {
        let participants = players(5);
        let mut structure = swiss(4).generate(&participants, "t").unwrap();
        let mut byes = Vec::new();

        for round in 1..=4 {
            if round > 1 {
                structure = play_round(structure, round - 1);
                structure = pair_next_round(structure, &participants, round).unwrap();
            }
            let sitting_out: Vec<&ParticipantId> = participants
                .iter()
                .filter(|p| !structure.round(round).any(|m| m.involves(p)))
                .collect();
            assert_eq!(sitting_out.len(), 1);
            byes.push(sitting_out[0].clone());
        }

        let unique: HashSet<&String> = byes.iter().collect();
        assert_eq!(unique.len(), byes.len());
    }

    #[test]
    fn test_pairing_rejects_other_formats_and_rounds() {
        let structure = swiss(2).generate(&players(4), "t").unwrap();
        assert_eq!(
            pair_next_round(structure.clone(), &players(4), 3).unwrap_err(),
            BracketError::InvalidRoundCount(3)
        );

        let mut other = structure;
        other.format = BracketFormat::RoundRobin;
        assert_eq!(
            pair_next_round(other, &players(4), 2).unwrap_err().kind(),
            "unsupported_format"
        );
    }

    #[test]
    fn test_rematch_fallback() {
        let ranking = ["A", "B"];
        let met: HashSet<(&str, &str)> = [("A", "B")].into_iter().collect();
        assert_eq!(pair_without_rematches(&ranking, &met), None);

        let ranking = ["A", "B", "C", "D"];
        let met: HashSet<(&str, &str)> = [("A", "B")].into_iter().collect();
        assert_eq!(
            pair_without_rematches(&ranking, &met),
            Some(vec![("A", "C"), ("B", "D")])
        );
    }

    #[test]
    fn test_ranking_uses_game_points_over_differential() {
        let participants = players(8);
        let mut structure = swiss(3).generate(&participants, "t").unwrap();

        // Winners' records: 10-9, 3-0, 9-8, 2-1
        let scores = [(10, 9), (3, 0), (9, 8), (2, 1)];
        let round_one: Vec<(String, String, String)> = structure
            .round(1)
            .map(|m| {
                (
                    m.id.clone(),
                    m.participant_a.clone().unwrap(),
                    m.participant_b.clone().unwrap(),
                )
            })
            .collect();
        for ((id, _, _), (a, b)) in round_one.iter().zip(scores) {
            structure = record_result(structure, id, a, b).unwrap();
        }

        let structure = pair_next_round(structure, &participants, 2).unwrap();
        let paired: HashSet<(&str, &str)> = structure
            .round(2)
            .map(|m| {
                pair_key(
                    m.participant_a.as_deref().unwrap(),
                    m.participant_b.as_deref().unwrap(),
                )
            })
            .collect();

        let w = |i: usize| round_one[i].1.as_str();
        let l = |i: usize| round_one[i].2.as_str();
        let expected: HashSet<(&str, &str)> = [
            pair_key(w(0), w(2)),
            pair_key(w(1), w(3)),
            pair_key(l(0), l(2)),
            pair_key(l(3), l(1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(paired, expected);
    }

    #[test]
    fn test_odd_groups_that_met_each_other_pair_quickly() {
        let xs: Vec<ParticipantId> = (1..=15).map(|i| format!("X{i}")).collect();
        let ys: Vec<ParticipantId> = (1..=15).map(|i| format!("Y{i}")).collect();
        let participants: Vec<ParticipantId> = xs.iter().chain(&ys).cloned().collect();

        let mut ids = MatchIds::default();
        let mut matches = Vec::new();
        for x in &xs {
            for y in &ys {
                let position = matches.len() as u32 + 1;
                let mut m = Match::scheduled(ids.next_id(), "t", 1, position, x.clone(), y.clone());
                m.score_a = 1;
                m.winner = Some(x.clone());
                m.status = MatchStatus::Completed;
                matches.push(m);
            }
        }
        for position in 1..=15 {
            matches.push(Match::placeholder(ids.next_id(), "t", 2, position));
        }
        let structure = BracketStructure::new(BracketFormat::SwissSystem, matches, 2);

        let started = Instant::now();
        let structure = pair_next_round(structure, &participants, 2).unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));

        let round_two: Vec<&Match> = structure.round(2).collect();
        let mut seen = HashSet::new();
        for m in &round_two {
            assert!(seen.insert(m.participant_a.clone().unwrap()));
            assert!(seen.insert(m.participant_b.clone().unwrap()));
        }
        assert_eq!(seen.len(), 30);

        // Two groups of fifteen force exactly one cross-group rematch
        let rematches = round_two
            .iter()
            .filter(|m| {
                let a = m.participant_a.as_deref().unwrap();
                let b = m.participant_b.as_deref().unwrap();
                a.starts_with('X') != b.starts_with('X')
            })
            .count();
        assert_eq!(rematches, 1);
    }

    #[test]
    fn test_unpairable_connected_field_gives_up() {
        // Three groups of eleven that have all met across groups, plus one newcomer
        let names: Vec<String> = (0..3)
            .flat_map(|g| (1..=11).map(move |i| format!("G{g}-{i}")))
            .chain(["NEW".to_string()])
            .collect();
        let ranking: Vec<&str> = names.iter().map(String::as_str).collect();
        let group = |name: &str| name.split('-').next().map(str::to_string);

        let mut met = HashSet::new();
        for (i, a) in ranking.iter().enumerate() {
            for b in &ranking[i + 1..] {
                if *a != "NEW" && *b != "NEW" && group(*a) != group(*b) {
                    met.insert(pair_key(*a, *b));
                }
            }
        }

        let started = Instant::now();
        assert_eq!(pair_without_rematches(&ranking, &met), None);
        assert!(started.elapsed() < Duration::from_secs(5));

        let pairs = pair_fewest_rematches(&ranking, &met);
        assert_eq!(pairs.len(), 17);
    }
}
