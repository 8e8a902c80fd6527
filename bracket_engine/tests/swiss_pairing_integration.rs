//! Integration tests for Swiss system tournaments
//!
//! A full Swiss event is generated through the dispatcher, every round is
//! played, and the next one paired from the standings.

#[cfg(test)]
mod swiss_tests {
    use bracket_engine::{
        BracketConfig, BracketError, BracketStructure, advance_from_swiss, compute_standings,
        compute_swiss_standings, generate_bracket, generate_bracket_with, pair_next_round,
        record_result,
    };
    use std::collections::HashSet;

    fn players(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("P{i:02}")).collect()
    }

    /// Decide a round: the lexically smaller participant wins
    fn play_round(mut structure: BracketStructure, round: u32) -> BracketStructure {
        let results: Vec<(String, i64, i64)> = structure
            .round(round)
            .map(|m| {
                let a_wins = m.participant_a < m.participant_b;
                let (sa, sb) = if a_wins { (3, 1) } else { (1, 3) };
                (m.id.clone(), sa, sb)
            })
            .collect();

        for (id, sa, sb) in results {
            structure = record_result(structure, &id, sa, sb).unwrap();
        }
        structure
    }

    fn run_event(n: usize, rounds: u32, seed: u64) -> BracketStructure {
        let participants = players(n);
        let config = BracketConfig::default()
            .with_swiss_rounds(rounds)
            .with_seed(seed);
        let mut structure =
            generate_bracket_with(&participants, "open", "swiss-system", None, &config).unwrap();

        for round in 1..=rounds {
            if round > 1 {
                structure = pair_next_round(structure, &participants, round).unwrap();
            }
            structure = play_round(structure, round);
        }
        structure
    }

    #[test]
    fn test_full_event_has_no_rematches() {
        let structure = run_event(16, 5, 11);

        let mut met = HashSet::new();
        for m in &structure.matches {
            let mut pair = [m.participant_a.clone().unwrap(), m.participant_b.clone().unwrap()];
            pair.sort();
            assert!(met.insert(pair), "rematch in {}", m.id);
        }
        assert_eq!(met.len(), 8 * 5);
    }

    #[test]
    fn test_full_event_everyone_plays_once_per_round() {
        let structure = run_event(12, 4, 3);

        for round in 1..=4 {
            let mut seen = HashSet::new();
            for m in structure.round(round) {
                assert!(seen.insert(m.participant_a.clone().unwrap()));
                assert!(seen.insert(m.participant_b.clone().unwrap()));
            }
            assert_eq!(seen.len(), 12);
        }
    }

    #[test]
    fn test_clear_leader_after_event() {
        let structure = run_event(8, 3, 99);
        let standings = compute_standings(&structure.matches);

        // P01 beats everyone it meets
        assert_eq!(standings[0].participant, "P01");
        assert_eq!(standings[0].wins, 3);
    }

    #[test]
    fn test_pairing_twice_is_rejected() {
        let participants = players(4);
        let config = BracketConfig::default().with_seed(1);
        let structure =
            generate_bracket_with(&participants, "t", "swiss", None, &config).unwrap();
        let structure = play_round(structure, 1);
        let structure = pair_next_round(structure, &participants, 2).unwrap();

        let err = pair_next_round(structure, &participants, 2).unwrap_err();
        assert_eq!(err.kind(), "inconsistent_match_data");
    }

    #[test]
    fn test_pairing_waits_for_results() {
        let participants = players(6);
        let config = BracketConfig::default().with_seed(2);
        let structure =
            generate_bracket_with(&participants, "t", "swiss", None, &config).unwrap();

        let first = structure.round(1).next().unwrap().id.clone();
        let structure = record_result(structure, &first, 1, 0).unwrap();
        assert_eq!(
            pair_next_round(structure, &participants, 2).unwrap_err(),
            BracketError::RoundNotReady {
                round: 2,
                pending: 2
            }
        );
    }

    #[test]
    fn test_swiss_qualifiers_seed_an_elimination_bracket() {
        let participants = players(8);
        let structure = run_event(8, 3, 99);

        let standings = compute_swiss_standings(&participants, &structure.matches);
        assert_eq!(standings[0].participant, "P01");
        assert_eq!(standings[0].points, 3.0);

        let advancing = advance_from_swiss(&structure, &participants, 4).unwrap();
        let top_four: Vec<String> = standings.iter().take(4).map(|r| r.participant.clone()).collect();
        assert_eq!(advancing, top_four);

        let playoff =
            generate_bracket(&advancing, "playoff", "single-elimination-seeded", None).unwrap();
        let first = playoff.round(1).next().unwrap();
        assert_eq!(first.participant_a.as_deref(), Some("P01"));
        assert_eq!(first.participant_b.as_ref(), Some(&advancing[3]));
    }

    #[test]
    fn test_field_too_small_for_requested_rounds() {
        let config = BracketConfig::default().with_swiss_rounds(6);
        assert_eq!(
            generate_bracket_with(&players(6), "t", "swiss", None, &config).unwrap_err(),
            BracketError::InvalidRoundCount(6)
        );
    }
}
