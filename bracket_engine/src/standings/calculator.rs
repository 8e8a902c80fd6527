//! Standings calculation from completed matches.

use log::warn;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::bracket::{BracketError, BracketResult, Match, ParticipantId};

use super::models::TeamRecord;

/// Records indexed by participant, kept in first-appearance order
#[derive(Debug, Default)]
struct StandingsTable {
    records: Vec<TeamRecord>,
    index: HashMap<ParticipantId, usize>,
}

impl StandingsTable {
    fn entry(&mut self, participant: &ParticipantId) -> &mut TeamRecord {
        let idx = match self.index.get(participant) {
            Some(&idx) => idx,
            None => {
                self.records.push(TeamRecord::new(participant.clone()));
                self.index.insert(participant.clone(), self.records.len() - 1);
                self.records.len() - 1
            }
        };
        &mut self.records[idx]
    }

    fn record(&mut self, m: &Match) {
        if !m.is_completed() {
            return;
        }

        let (Some(a), Some(b)) = (&m.participant_a, &m.participant_b) else {
            if !m.is_bye() {
                warn!("Skipping completed match {} with a missing participant", m.id);
            }
            return;
        };

        self.entry(a).record_game(m.score_a, m.score_b);
        self.entry(b).record_game(m.score_b, m.score_a);
    }

    fn into_sorted(mut self) -> Vec<TeamRecord> {
        self.records.sort_by(standings_order);
        self.records
    }
}

/// Wins, then point differential, then points for; all descending
pub fn standings_order(a: &TeamRecord, b: &TeamRecord) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.point_differential.cmp(&a.point_differential))
        .then_with(|| b.points_for.cmp(&a.points_for))
}

/// Compute ordered standings from a set of matches.
///
/// Only completed matches with both participants present contribute. Anything
/// else is skipped without error. Ties beyond points for keep the order in
/// which participants first appear in `matches`.
///
/// # Example
///
/// ```
/// use bracket_engine::bracket::{Match, MatchStatus};
/// use bracket_engine::standings::compute_standings;
///
/// let mut m = Match::scheduled("match-1".into(), "t", 1, 1, "A".into(), "B".into());
/// m.score_a = 10;
/// m.score_b = 5;
/// m.winner = Some("A".into());
/// m.status = MatchStatus::Completed;
///
/// let standings = compute_standings(&[m]);
/// assert_eq!(standings[0].participant, "A");
/// assert_eq!(standings[0].point_differential, 5);
/// ```
pub fn compute_standings(matches: &[Match]) -> Vec<TeamRecord> {
    let mut table = StandingsTable::default();
    for m in matches {
        table.record(m);
    }
    table.into_sorted()
}

/// Standings in which every listed participant appears, played or not.
///
/// Participants that have not played yet rank by the same keys (all zero) and
/// otherwise keep their order in `participants`.
pub fn seeded_standings(participants: &[ParticipantId], matches: &[Match]) -> Vec<TeamRecord> {
    let mut table = StandingsTable::default();
    for participant in participants {
        table.entry(participant);
    }
    for m in matches {
        table.record(m);
    }
    table.into_sorted()
}

/// Check matches against the match invariants.
///
/// A completed match needs a winner that is one of its participants, and both
/// participants unless it is a bye (only `participant_a`, who is the winner).
pub fn validate_matches(matches: &[Match]) -> BracketResult<()> {
    for m in matches {
        if let Some(winner) = &m.winner
            && !m.involves(winner)
        {
            return Err(BracketError::inconsistent(
                &m.id,
                format!("winner {winner} is not a participant"),
            ));
        }

        if !m.is_completed() {
            continue;
        }

        let Some(winner) = &m.winner else {
            return Err(BracketError::inconsistent(&m.id, "completed without a winner"));
        };

        match (&m.participant_a, &m.participant_b) {
            (Some(_), Some(_)) => {}
            (Some(a), None) if a == winner => {}
            _ => {
                return Err(BracketError::inconsistent(
                    &m.id,
                    "completed with a missing participant",
                ));
            }
        }
    }
    Ok(())
}

/// [`compute_standings`] that rejects inconsistent match data instead of skipping it
pub fn compute_standings_strict(matches: &[Match]) -> BracketResult<Vec<TeamRecord>> {
    validate_matches(matches)?;
    Ok(compute_standings(matches))
}
