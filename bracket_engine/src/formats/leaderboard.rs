//! Leaderboard for individual-performance sports.

use log::debug;

use crate::bracket::{BracketFormat, BracketResult, BracketStructure, Match, ParticipantId};

use super::{FormatGenerator, validate_participants};

/// Sport recorded when no hint is given
pub const DEFAULT_SPORT: &str = "track";

/// One `entry-N` per participant at round 1, with no opponent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub sport: String,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self {
            sport: DEFAULT_SPORT.to_string(),
        }
    }
}

impl FormatGenerator for Leaderboard {
    fn format(&self) -> BracketFormat {
        BracketFormat::Leaderboard
    }

    fn generate(
        &self,
        participants: &[ParticipantId],
        tournament_id: &str,
    ) -> BracketResult<BracketStructure> {
        validate_participants(participants)?;

        let matches = (1..)
            .zip(participants)
            .map(|(position, participant)| {
                let mut entry =
                    Match::placeholder(format!("entry-{position}"), tournament_id, 1, position);
                entry.participant_a = Some(participant.clone());
                entry
            })
            .collect();

        debug!(
            "Leaderboard ({}) for {} participant(s)",
            self.sport,
            participants.len()
        );

        let mut structure = BracketStructure::new(self.format(), matches, 1);
        structure.sport = Some(self.sport.clone());
        Ok(structure)
    }
}
