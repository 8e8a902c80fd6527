//! Standings data models.

use serde::{Deserialize, Serialize};

use crate::bracket::ParticipantId;

/// Win/loss record of one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub participant: ParticipantId,
    pub wins: u32,
    pub losses: u32,
    pub points_for: i64,
    pub points_against: i64,
    /// Always `points_for - points_against`
    pub point_differential: i64,
    pub games_played: u32,
}

impl TeamRecord {
    /// Create an empty record
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            wins: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
            point_differential: 0,
            games_played: 0,
        }
    }

    /// Fold one finished game into the record.
    ///
    /// Equal scores count as a game played without a win or a loss. Totals
    /// saturate at the `i64` bounds.
    pub fn record_game(&mut self, scored: i64, conceded: i64) {
        self.games_played = self.games_played.saturating_add(1);
        self.points_for = self.points_for.saturating_add(scored);
        self.points_against = self.points_against.saturating_add(conceded);

        if scored > conceded {
            self.wins = self.wins.saturating_add(1);
        } else if scored < conceded {
            self.losses = self.losses.saturating_add(1);
        }

        self.point_differential = self.points_for.saturating_sub(self.points_against);
    }

    /// Games that ended level
    pub fn draws(&self) -> u32 {
        self.games_played
            .saturating_sub(self.wins)
            .saturating_sub(self.losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_zeroed() {
        let record = TeamRecord::new("A".to_string());
        assert_eq!(record.wins, 0);
        assert_eq!(record.losses, 0);
        assert_eq!(record.games_played, 0);
        assert_eq!(record.point_differential, 0);
    }

    #[test]
    fn test_record_game() {
        let mut record = TeamRecord::new("A".to_string());
        record.record_game(10, 5);
        record.record_game(3, 7);

        assert_eq!(record.wins, 1);
        assert_eq!(record.losses, 1);
        assert_eq!(record.points_for, 13);
        assert_eq!(record.points_against, 12);
        assert_eq!(record.point_differential, 1);
        assert_eq!(record.games_played, 2);
    }

    #[test]
    fn test_drawn_game_counts_as_played_only() {
        let mut record = TeamRecord::new("C".to_string());
        record.record_game(8, 8);

        assert_eq!(record.games_played, 1);
        assert_eq!(record.wins + record.losses, 0);
        assert_eq!(record.draws(), 1);
    }

    #[test]
    fn test_extreme_scores_saturate() {
        let mut record = TeamRecord::new("A".to_string());
        record.record_game(i64::MAX, i64::MIN);
        record.record_game(i64::MAX, i64::MIN);

        assert_eq!(record.points_for, i64::MAX);
        assert_eq!(record.points_against, i64::MIN);
        assert_eq!(record.point_differential, i64::MAX);
        assert_eq!(record.wins, 2);
    }
}
