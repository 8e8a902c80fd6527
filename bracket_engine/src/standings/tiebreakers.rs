//! Ordered tiebreaker resolution.

use rand::{Rng, rngs::StdRng};
use std::collections::{HashMap, HashSet};

use crate::bracket::{Match, Tiebreaker};
use crate::formats::seeded_rng;

use super::models::TeamRecord;

/// Per-member sort key produced by one tiebreaker (higher ranks first)
type TiebreakKey = (i64, i64);

/// Order records by wins, then split every group of equal wins with the
/// tiebreakers in order.
///
/// Each tiebreaker sorts the group by a key and hands every run of equal keys
/// to the next tiebreaker. Members still tied after the last tiebreaker keep
/// their order in `records`. `seed` only matters for [`Tiebreaker::CoinFlip`].
pub fn apply_tiebreakers(
    records: &[TeamRecord],
    matches: &[Match],
    tiebreakers: &[Tiebreaker],
    seed: Option<u64>,
) -> Vec<TeamRecord> {
    rank_with(records.to_vec(), matches, tiebreakers, &mut seeded_rng(seed))
}

pub(crate) fn rank_with(
    mut records: Vec<TeamRecord>,
    matches: &[Match],
    tiebreakers: &[Tiebreaker],
    rng: &mut StdRng,
) -> Vec<TeamRecord> {
    records.sort_by(|a, b| b.wins.cmp(&a.wins));

    let mut ranked = Vec::with_capacity(records.len());
    let mut group: Vec<TeamRecord> = Vec::new();
    for record in records {
        if group.last().is_some_and(|last| last.wins != record.wins) {
            ranked.extend(resolve(std::mem::take(&mut group), matches, tiebreakers, rng));
        }
        group.push(record);
    }
    ranked.extend(resolve(group, matches, tiebreakers, rng));
    ranked
}

fn resolve(
    group: Vec<TeamRecord>,
    matches: &[Match],
    tiebreakers: &[Tiebreaker],
    rng: &mut StdRng,
) -> Vec<TeamRecord> {
    let Some((&tiebreaker, rest)) = tiebreakers.split_first() else {
        return group;
    };
    if group.len() < 2 {
        return group;
    }

    let keys = tiebreak_keys(tiebreaker, &group, matches, rng);
    let mut keyed: Vec<(TiebreakKey, TeamRecord)> = keys.into_iter().zip(group).collect();
    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));

    let mut resolved = Vec::with_capacity(keyed.len());
    let mut run: Vec<TeamRecord> = Vec::new();
    let mut run_key = None;
    for (key, record) in keyed {
        if run_key.is_some_and(|k| k != key) {
            resolved.extend(resolve(std::mem::take(&mut run), matches, rest, rng));
        }
        run_key = Some(key);
        run.push(record);
    }
    resolved.extend(resolve(run, matches, rest, rng));
    resolved
}

fn tiebreak_keys(
    tiebreaker: Tiebreaker,
    group: &[TeamRecord],
    matches: &[Match],
    rng: &mut StdRng,
) -> Vec<TiebreakKey> {
    match tiebreaker {
        Tiebreaker::HeadToHead => {
            let inside = head_to_head_records(group, matches);
            group
                .iter()
                .map(|r| {
                    inside
                        .get(r.participant.as_str())
                        .map_or((0, 0), |h| (i64::from(h.wins), h.point_differential))
                })
                .collect()
        }
        Tiebreaker::PointDifferential => group.iter().map(|r| (r.point_differential, 0)).collect(),
        Tiebreaker::PointsFor => group.iter().map(|r| (r.points_for, 0)).collect(),
        Tiebreaker::CoinFlip => group
            .iter()
            .map(|_| (i64::from(rng.random::<u32>()), 0))
            .collect(),
    }
}

/// Records built only from completed matches played between group members
fn head_to_head_records<'a>(
    group: &'a [TeamRecord],
    matches: &[Match],
) -> HashMap<&'a str, TeamRecord> {
    let members: HashSet<&str> = group.iter().map(|r| r.participant.as_str()).collect();
    let mut records: HashMap<&'a str, TeamRecord> = HashMap::new();

    for m in matches.iter().filter(|m| m.is_completed()) {
        let (Some(a), Some(b)) = (&m.participant_a, &m.participant_b) else {
            continue;
        };
        let (Some(&a), Some(&b)) = (members.get(a.as_str()), members.get(b.as_str())) else {
            continue;
        };

        records
            .entry(a)
            .or_insert_with(|| TeamRecord::new(a.to_string()))
            .record_game(m.score_a, m.score_b);
        records
            .entry(b)
            .or_insert_with(|| TeamRecord::new(b.to_string()))
            .record_game(m.score_b, m.score_a);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::MatchStatus;
    use crate::standings::compute_standings;

    fn completed(id: usize, a: &str, b: &str, score_a: i64, score_b: i64) -> Match {
        let mut m = Match::scheduled(format!("match-{id}"), "t", 1, 1, a.into(), b.into());
        m.score_a = score_a;
        m.score_b = score_b;
        m.status = MatchStatus::Completed;
        m.winner = Some(if score_a > score_b { a } else { b }.to_string());
        m
    }

    fn names(records: &[TeamRecord]) -> Vec<&str> {
        records.iter().map(|r| r.participant.as_str()).collect()
    }

    #[test]
    fn test_three_way_head_to_head_uses_group_differential() {
        let matches = vec![
            completed(1, "A", "B", 3, 2),
            completed(2, "B", "C", 20, 0),
            completed(3, "C", "A", 5, 1),
        ];
        let standings = compute_standings(&matches);
        let ranked = apply_tiebreakers(
            &standings,
            &matches,
            &[Tiebreaker::HeadToHead, Tiebreaker::PointDifferential],
            None,
        );

        // Everyone is 1-1 inside the group, so the in-group differential decides
        assert_eq!(names(&ranked), ["B", "A", "C"]);
    }

    #[test]
    fn test_head_to_head_two_way() {
        let matches = vec![
            completed(1, "A", "B", 3, 2),
            completed(2, "B", "C", 20, 0),
            completed(3, "A", "D", 0, 1),
            completed(4, "C", "D", 1, 0),
        ];
        let standings = compute_standings(&matches);
        let b_then_a: Vec<TeamRecord> = ["B", "A"]
            .iter()
            .filter_map(|p| standings.iter().find(|r| r.participant == *p).cloned())
            .collect();

        let ranked = apply_tiebreakers(
            &b_then_a,
            &matches,
            &[Tiebreaker::HeadToHead, Tiebreaker::PointDifferential],
            None,
        );
        assert_eq!(names(&ranked), ["A", "B"]);

        let ranked = apply_tiebreakers(&b_then_a, &matches, &[Tiebreaker::PointDifferential], None);
        assert_eq!(names(&ranked), ["B", "A"]);
    }

    #[test]
    fn test_wins_always_dominate() {
        let matches = vec![completed(1, "A", "B", 1, 0), completed(2, "C", "D", 50, 0)];
        let standings = compute_standings(&matches);
        let ranked = apply_tiebreakers(&standings, &matches, &[Tiebreaker::PointsFor], None);

        assert_eq!(names(&ranked)[..2], ["C", "A"]);
        assert!(ranked[..2].iter().all(|r| r.wins == 1));
    }

    #[test]
    fn test_no_tiebreakers_keeps_input_order() {
        let records: Vec<TeamRecord> = ["X", "Y", "Z"]
            .iter()
            .map(|p| TeamRecord::new(p.to_string()))
            .collect();
        let ranked = apply_tiebreakers(&records, &[], &[], None);
        assert_eq!(names(&ranked), ["X", "Y", "Z"]);
    }

    #[test]
    fn test_coin_flip_is_seeded() {
        let records: Vec<TeamRecord> = (0..8).map(|i| TeamRecord::new(format!("P{i}"))).collect();

        let first = apply_tiebreakers(&records, &[], &[Tiebreaker::CoinFlip], Some(7));
        let second = apply_tiebreakers(&records, &[], &[Tiebreaker::CoinFlip], Some(7));
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }
}
