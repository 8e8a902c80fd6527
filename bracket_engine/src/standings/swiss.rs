//! Swiss standings: match points, Buchholz and strength of schedule.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::bracket::{Match, ParticipantId};

/// Swiss record of one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwissRecord {
    pub participant: ParticipantId,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// 1 per win, 0.5 per draw
    pub points: f64,
    /// Sum of the participant's own scores
    pub game_points: i64,
    /// Sum of the opponents' points (Buchholz score)
    pub buchholz: f64,
    /// Mean win rate of the opponents faced
    pub strength_of_schedule: f64,
}

impl SwissRecord {
    fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            wins: 0,
            losses: 0,
            draws: 0,
            points: 0.0,
            game_points: 0,
            buchholz: 0.0,
            strength_of_schedule: 0.0,
        }
    }

    /// Games that counted towards the record
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    fn win_rate(&self) -> f64 {
        match self.games_played() {
            0 => 0.0,
            played => f64::from(self.wins) / f64::from(played),
        }
    }
}

/// Points, then Buchholz, then game points, then strength of schedule; all descending
pub fn swiss_order(a: &SwissRecord, b: &SwissRecord) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| b.buchholz.total_cmp(&a.buchholz))
        .then_with(|| b.game_points.cmp(&a.game_points))
        .then_with(|| b.strength_of_schedule.total_cmp(&a.strength_of_schedule))
}

/// Swiss standings over the completed two-sided matches in `matches`.
///
/// Every participant in `participants` gets a record, played or not, and
/// anyone else appearing in a counted match is appended. Byes earn nothing.
/// Records still level after strength of schedule keep their order of
/// appearance.
pub fn compute_swiss_standings(
    participants: &[ParticipantId],
    matches: &[Match],
) -> Vec<SwissRecord> {
    let mut records: Vec<SwissRecord> = Vec::with_capacity(participants.len());
    let mut index: HashMap<ParticipantId, usize> = HashMap::with_capacity(participants.len());
    let mut opponents: Vec<Vec<usize>> = Vec::with_capacity(participants.len());

    let mut entry = |participant: &ParticipantId,
                     records: &mut Vec<SwissRecord>,
                     opponents: &mut Vec<Vec<usize>>| {
        *index.entry(participant.clone()).or_insert_with(|| {
            records.push(SwissRecord::new(participant.clone()));
            opponents.push(Vec::new());
            records.len() - 1
        })
    };

    for participant in participants {
        entry(participant, &mut records, &mut opponents);
    }

    for m in matches.iter().filter(|m| m.is_completed()) {
        let (Some(a), Some(b)) = (&m.participant_a, &m.participant_b) else {
            continue;
        };
        let a = entry(a, &mut records, &mut opponents);
        let b = entry(b, &mut records, &mut opponents);

        let sides = [(a, b, m.score_a, m.score_b), (b, a, m.score_b, m.score_a)];
        for (me, them, scored, conceded) in sides {
            let record = &mut records[me];
            record.game_points = record.game_points.saturating_add(scored);
            match scored.cmp(&conceded) {
                Ordering::Greater => {
                    record.wins += 1;
                    record.points += 1.0;
                }
                Ordering::Less => record.losses += 1,
                Ordering::Equal => {
                    record.draws += 1;
                    record.points += 0.5;
                }
            }
            opponents[me].push(them);
        }
    }

    let points: Vec<f64> = records.iter().map(|r| r.points).collect();
    let win_rates: Vec<f64> = records.iter().map(SwissRecord::win_rate).collect();
    for (record, faced) in records.iter_mut().zip(&opponents) {
        record.buchholz = faced.iter().map(|&o| points[o]).sum();
        if !faced.is_empty() {
            record.strength_of_schedule =
                faced.iter().map(|&o| win_rates[o]).sum::<f64>() / faced.len() as f64;
        }
    }

    records.sort_by(swiss_order);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::MatchStatus;

    fn completed(id: &str, a: &str, b: &str, score_a: i64, score_b: i64) -> Match {
        let mut m = Match::scheduled(id.to_string(), "t", 1, 1, a.into(), b.into());
        m.score_a = score_a;
        m.score_b = score_b;
        m.status = MatchStatus::Completed;
        if score_a != score_b {
            m.winner = Some(if score_a > score_b { a } else { b }.to_string());
        }
        m
    }

    fn entrants(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn order(records: &[SwissRecord]) -> Vec<&str> {
        records.iter().map(|r| r.participant.as_str()).collect()
    }

    #[test]
    fn test_buchholz_outranks_point_differential() {
        let matches = vec![
            completed("match-1", "A", "B", 1, 0),
            completed("match-2", "C", "D", 10, 0),
            completed("match-3", "B", "E", 1, 0),
        ];

        let standings = compute_swiss_standings(&entrants(&["A", "B", "C", "D", "E"]), &matches);

        // A and C are both 1-0, but A's opponent has since won a game
        assert_eq!(order(&standings), ["A", "B", "C", "D", "E"]);
        assert_eq!(standings[0].buchholz, 1.0);
        assert_eq!(standings[2].buchholz, 0.0);
    }

    #[test]
    fn test_draws_earn_half_points() {
        let matches = vec![
            completed("match-1", "A", "B", 2, 2),
            completed("match-2", "A", "C", 3, 1),
        ];

        let standings = compute_swiss_standings(&entrants(&["A", "B", "C"]), &matches);
        let a = &standings[0];
        assert_eq!(a.participant, "A");
        assert_eq!(a.points, 1.5);
        assert_eq!((a.wins, a.draws, a.losses), (1, 1, 0));
        assert_eq!(a.game_points, 5);
        assert_eq!(a.buchholz, 0.5);

        let b = standings.iter().find(|r| r.participant == "B").unwrap();
        assert_eq!(b.points, 0.5);
        assert_eq!(b.buchholz, 1.5);
    }

    #[test]
    fn test_strength_of_schedule_averages_opponent_win_rates() {
        let matches = vec![
            completed("match-1", "A", "B", 1, 0),
            completed("match-2", "A", "C", 1, 0),
            completed("match-3", "B", "C", 1, 0),
        ];

        let standings = compute_swiss_standings(&entrants(&["A", "B", "C"]), &matches);
        assert_eq!(order(&standings), ["A", "B", "C"]);

        // C faced A (2-0) and B (1-1)
        let c = &standings[2];
        assert_eq!(c.strength_of_schedule, 0.75);
        assert_eq!(c.games_played(), 2);
    }

    #[test]
    fn test_idle_participants_keep_entry_order() {
        let standings = compute_swiss_standings(&entrants(&["Z", "Y", "X"]), &[]);
        assert_eq!(order(&standings), ["Z", "Y", "X"]);
        assert!(standings.iter().all(|r| r.points == 0.0 && r.games_played() == 0));
    }

    #[test]
    fn test_unfinished_matches_and_byes_are_ignored() {
        let mut pending = completed("match-1", "A", "B", 3, 0);
        pending.status = MatchStatus::InProgress;

        let mut bye = Match::placeholder("match-2".to_string(), "t", 1, 2);
        bye.participant_a = Some("C".to_string());
        bye.winner = Some("C".to_string());
        bye.status = MatchStatus::Completed;

        let standings = compute_swiss_standings(&entrants(&["A", "B", "C"]), &[pending, bye]);
        assert!(standings.iter().all(|r| r.games_played() == 0));
    }
}
