//! Single elimination in input order.

use log::debug;

use crate::bracket::{BracketFormat, BracketResult, BracketStructure, MatchIds, ParticipantId};

use super::{FormatGenerator, elimination_matches, elimination_rounds, validate_participants};

/// Knockout bracket pairing participants positionally.
///
/// Round 1 pairs the first `floor(n/2) * 2` participants as listed. An odd
/// participant out is not auto-advanced; the caller grants the
/// [`bye_count`] byes while filling round 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleElimination;

impl FormatGenerator for SingleElimination {
    fn format(&self) -> BracketFormat {
        BracketFormat::SingleElimination
    }

    fn generate(
        &self,
        participants: &[ParticipantId],
        tournament_id: &str,
    ) -> BracketResult<BracketStructure> {
        validate_participants(participants)?;

        let total_rounds = elimination_rounds(participants.len());
        let round_one = participants
            .chunks_exact(2)
            .map(|pair| (Some(pair[0].clone()), Some(pair[1].clone())))
            .collect();
        let matches = elimination_matches(
            round_one,
            total_rounds,
            tournament_id,
            0,
            None,
            &mut MatchIds::default(),
        );

        debug!(
            "Single elimination for {} participant(s): {} round(s), {} bye(s)",
            participants.len(),
            total_rounds,
            bye_count(participants.len())
        );

        Ok(BracketStructure::new(self.format(), matches, total_rounds))
    }
}

/// Empty slots in a full bracket: `2^ceil(log2(n)) - n`
pub fn bye_count(participant_count: usize) -> usize {
    (1usize << elimination_rounds(participant_count)) - participant_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::BracketError;

    fn letters(n: usize) -> Vec<ParticipantId> {
        (b'A'..).take(n).map(|c| char::from(c).to_string()).collect()
    }

    #[test]
    fn test_eight_teams() {
        let structure = SingleElimination.generate(&letters(8), "t-1").unwrap();

        assert_eq!(structure.total_rounds, 3);
        assert_eq!(structure.total_matches, 7);
        assert_eq!(structure.format, BracketFormat::SingleElimination);

        let pairs: Vec<(&str, &str)> = structure
            .round(1)
            .map(|m| {
                (
                    m.participant_a.as_deref().unwrap(),
                    m.participant_b.as_deref().unwrap(),
                )
            })
            .collect();
        assert_eq!(pairs, [("A", "B"), ("C", "D"), ("E", "F"), ("G", "H")]);
        assert!(structure.round(2).all(|m| m.is_placeholder()));
        assert_eq!(structure.round(2).count(), 2);
        assert!(structure.matches.iter().all(|m| m.tournament_id == "t-1"));
        assert!(structure.matches.iter().all(|m| m.bracket_section.is_none()));
    }

    #[test]
    fn test_five_teams_leaves_one_unpaired() {
        let structure = SingleElimination.generate(&letters(5), "t").unwrap();

        assert_eq!(structure.total_rounds, 3);
        assert_eq!(structure.round(1).count(), 2);
        assert_eq!(structure.round(2).count(), 2);
        assert_eq!(structure.round(3).count(), 1);
        assert_eq!(bye_count(5), 3);
        assert!(structure.matches.iter().all(|m| !m.involves("E")));
    }

    #[test]
    fn test_match_ids_and_positions() {
        let structure = SingleElimination.generate(&letters(4), "t").unwrap();
        let ids: Vec<&str> = structure.matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["match-1", "match-2", "match-3"]);

        let final_match = structure.round(2).next().unwrap();
        assert_eq!(final_match.position, 1);
    }

    #[test]
    fn test_rejects_single_participant() {
        let err = SingleElimination.generate(&letters(1), "t").unwrap_err();
        assert_eq!(
            err,
            BracketError::InvalidParticipantCount {
                minimum: 2,
                actual: 1
            }
        );
    }
}
