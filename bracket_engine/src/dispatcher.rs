//! Single entry point for bracket generation.

use log::debug;

use crate::bracket::{BracketError, BracketFormat, BracketResult, BracketStructure, ParticipantId};
use crate::config::BracketConfig;
use crate::formats::{FormatGenerator, Generator};

/// Generate a bracket with the default configuration.
///
/// See [`generate_bracket_with`].
///
/// # Example
///
/// ```
/// use bracket_engine::generate_bracket;
///
/// let teams: Vec<String> = ["A", "B", "C", "D"].iter().map(|t| t.to_string()).collect();
/// let bracket = generate_bracket(&teams, "spring-cup", "single-elimination", None).unwrap();
/// assert_eq!(bracket.total_rounds, 2);
/// assert_eq!(bracket.total_matches, 3);
/// ```
pub fn generate_bracket(
    participants: &[ParticipantId],
    tournament_id: &str,
    format: &str,
    sport_hint: Option<&str>,
) -> BracketResult<BracketStructure> {
    generate_bracket_with(
        participants,
        tournament_id,
        format,
        sport_hint,
        &BracketConfig::default(),
    )
}

/// Generate a bracket for the format named by `format`.
///
/// Blank participant names are dropped before generation. Unknown format
/// identifiers fail with [`BracketError::UnsupportedFormat`] rather than
/// falling back to another format.
pub fn generate_bracket_with(
    participants: &[ParticipantId],
    tournament_id: &str,
    format: &str,
    sport_hint: Option<&str>,
    config: &BracketConfig,
) -> BracketResult<BracketStructure> {
    config.validate().map_err(BracketError::InvalidConfig)?;
    let format: BracketFormat = format.parse()?;

    let participants: Vec<ParticipantId> = participants
        .iter()
        .filter(|p| !p.trim().is_empty())
        .cloned()
        .collect();

    let generator = Generator::for_format(format, participants.len(), sport_hint, config);
    let structure = generator.generate(&participants, tournament_id)?;

    debug!(
        "Generated {} bracket for tournament {}: {} participant(s), {} round(s), {} match(es)",
        format,
        tournament_id,
        participants.len(),
        structure.total_rounds,
        structure.total_matches
    );

    Ok(structure)
}
