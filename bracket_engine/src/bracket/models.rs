//! Bracket data models: matches, pools, advancement rules and the generated structure.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::errors::BracketError;
use crate::standings::TeamRecord;

/// Participant identifier
pub type ParticipantId = String;

/// Tournament identifier
pub type TournamentId = String;

/// Match lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    InProgress,
    Completed,
}

/// Section of a double elimination bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSection {
    Winners,
    Losers,
    Championship,
}

/// One of the two participant slots of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    A,
    B,
}

/// A single contest between (up to) two participants.
///
/// `None` participants are "TBD" slots that a later result fills in. A match
/// with `participant_a` set and `participant_b` empty that is already completed
/// is a bye.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Unique within the structure
    pub id: String,
    pub tournament_id: TournamentId,
    /// 1-based, increases toward the final
    pub round: u32,
    /// 1-based slot index within the round
    pub position: u32,
    pub participant_a: Option<ParticipantId>,
    pub participant_b: Option<ParticipantId>,
    #[serde(default)]
    pub score_a: i64,
    #[serde(default)]
    pub score_b: i64,
    pub winner: Option<ParticipantId>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_section: Option<BracketSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
}

impl Match {
    /// Create an upcoming match between two known participants
    pub fn scheduled(
        id: String,
        tournament_id: &str,
        round: u32,
        position: u32,
        participant_a: ParticipantId,
        participant_b: ParticipantId,
    ) -> Self {
        Self {
            participant_a: Some(participant_a),
            participant_b: Some(participant_b),
            ..Self::placeholder(id, tournament_id, round, position)
        }
    }

    /// Create an upcoming match whose participants are not known yet
    pub fn placeholder(id: String, tournament_id: &str, round: u32, position: u32) -> Self {
        Self {
            id,
            tournament_id: tournament_id.to_string(),
            round,
            position,
            participant_a: None,
            participant_b: None,
            score_a: 0,
            score_b: 0,
            winner: None,
            status: MatchStatus::Upcoming,
            bracket_section: None,
            pool_id: None,
        }
    }

    /// Tag the match with a double elimination section
    pub fn with_section(mut self, section: BracketSection) -> Self {
        self.bracket_section = Some(section);
        self
    }

    /// Tag the match with a pool
    pub fn with_pool(mut self, pool_id: &str) -> Self {
        self.pool_id = Some(pool_id.to_string());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Neither participant assigned yet
    pub fn is_placeholder(&self) -> bool {
        self.participant_a.is_none() && self.participant_b.is_none()
    }

    /// Completed with a single participant
    pub fn is_bye(&self) -> bool {
        self.is_completed() && self.participant_a.is_some() && self.participant_b.is_none()
    }

    /// Whether the participant plays in this match
    pub fn involves(&self, participant: &str) -> bool {
        self.participant_a.as_deref() == Some(participant)
            || self.participant_b.as_deref() == Some(participant)
    }

    /// The losing participant of a decided match
    pub fn loser(&self) -> Option<&ParticipantId> {
        let winner = self.winner.as_ref()?;
        if self.participant_a.as_ref() == Some(winner) {
            self.participant_b.as_ref()
        } else if self.participant_b.as_ref() == Some(winner) {
            self.participant_a.as_ref()
        } else {
            None
        }
    }

    /// Participant currently sitting in `slot`
    pub fn slot(&self, slot: Slot) -> Option<&ParticipantId> {
        match slot {
            Slot::A => self.participant_a.as_ref(),
            Slot::B => self.participant_b.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut Option<ParticipantId> {
        match slot {
            Slot::A => &mut self.participant_a,
            Slot::B => &mut self.participant_b,
        }
    }
}

/// Competition format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BracketFormat {
    #[serde(rename = "single-elimination")]
    SingleElimination,
    #[serde(rename = "single-elimination-seeded")]
    SeededSingleElimination,
    #[serde(rename = "double-elimination")]
    DoubleElimination,
    #[serde(rename = "pool-play-bracket")]
    PoolPlay,
    #[serde(rename = "round-robin")]
    RoundRobin,
    #[serde(rename = "swiss-system")]
    SwissSystem,
    #[serde(rename = "leaderboard")]
    Leaderboard,
}

impl BracketFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BracketFormat::SingleElimination => "single-elimination",
            BracketFormat::SeededSingleElimination => "single-elimination-seeded",
            BracketFormat::DoubleElimination => "double-elimination",
            BracketFormat::PoolPlay => "pool-play-bracket",
            BracketFormat::RoundRobin => "round-robin",
            BracketFormat::SwissSystem => "swiss-system",
            BracketFormat::Leaderboard => "leaderboard",
        }
    }

    /// Formats whose winners move into a later slot of an elimination tree
    pub fn is_elimination(&self) -> bool {
        matches!(
            self,
            BracketFormat::SingleElimination
                | BracketFormat::SeededSingleElimination
                | BracketFormat::DoubleElimination
                | BracketFormat::PoolPlay
        )
    }
}

impl fmt::Display for BracketFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BracketFormat {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single-elimination" => Ok(BracketFormat::SingleElimination),
            "seeded" | "single-elimination-seeded" => Ok(BracketFormat::SeededSingleElimination),
            "double" | "double-elimination" => Ok(BracketFormat::DoubleElimination),
            "pool-play" | "pool-play-bracket" => Ok(BracketFormat::PoolPlay),
            "round-robin" => Ok(BracketFormat::RoundRobin),
            "swiss" | "swiss-system" => Ok(BracketFormat::SwissSystem),
            "leaderboard" => Ok(BracketFormat::Leaderboard),
            _ => Err(BracketError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// How participants leave pool play for the bracket stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancementType {
    /// Best `count` participants across all pools
    TopTeams,
    /// Best `count` participants of every pool
    PoolWinners,
    /// Everyone with at least `threshold` wins
    PointsThreshold,
}

/// Tiebreakers, applied in order until the order is total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tiebreaker {
    HeadToHead,
    PointDifferential,
    PointsFor,
    CoinFlip,
}

/// Pool-to-bracket advancement rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementRules {
    #[serde(rename = "type")]
    pub advancement_type: AdvancementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
    /// Extra spots for the best participants the rule left out, ranked across all pools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcards: Option<u32>,
    pub tiebreakers: Vec<Tiebreaker>,
}

impl Default for AdvancementRules {
    /// Top two of every pool, separated by head-to-head, point differential, points for
    fn default() -> Self {
        Self {
            advancement_type: AdvancementType::PoolWinners,
            count: Some(2),
            threshold: None,
            wildcards: None,
            tiebreakers: vec![
                Tiebreaker::HeadToHead,
                Tiebreaker::PointDifferential,
                Tiebreaker::PointsFor,
            ],
        }
    }
}

/// A round-robin group preceding the bracket stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// `pool-1`, `pool-2`, ...
    pub id: String,
    /// `Pool A`, `Pool B`, ...
    pub name: String,
    pub participants: Vec<ParticipantId>,
    pub matches: Vec<Match>,
    pub standings: Vec<TeamRecord>,
}

/// The result of generating a bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketStructure {
    pub matches: Vec<Match>,
    pub total_rounds: u32,
    pub total_matches: usize,
    pub format: BracketFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pools: Option<Vec<Pool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advancement_rules: Option<AdvancementRules>,
    /// Participants the bracket stage takes when fewer than its tree holds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_slots: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
}

impl BracketStructure {
    /// Wrap generated matches; `total_matches` follows the match list
    pub fn new(format: BracketFormat, matches: Vec<Match>, total_rounds: u32) -> Self {
        Self {
            total_matches: matches.len(),
            matches,
            total_rounds,
            format,
            pools: None,
            advancement_rules: None,
            bracket_slots: None,
            sport: None,
        }
    }

    pub fn find_match(&self, match_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Matches of one round, in generation order
    pub fn round(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Matches of one double elimination section, in generation order
    pub fn section(&self, section: BracketSection) -> impl Iterator<Item = &Match> {
        self.matches
            .iter()
            .filter(move |m| m.bracket_section == Some(section))
    }

    pub fn pool(&self, pool_id: &str) -> Option<&Pool> {
        self.pools.as_ref()?.iter().find(|p| p.id == pool_id)
    }
}

/// Sequential `match-N` identifiers
#[derive(Debug, Default)]
pub(crate) struct MatchIds {
    next: usize,
}

impl MatchIds {
    pub(crate) fn starting_after(issued: usize) -> Self {
        Self { next: issued }
    }

    pub(crate) fn next_id(&mut self) -> String {
        self.next += 1;
        format!("match-{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decided(a: &str, b: &str, winner: &str) -> Match {
        let mut m = Match::scheduled("match-1".to_string(), "t", 1, 1, a.into(), b.into());
        m.status = MatchStatus::Completed;
        m.winner = Some(winner.to_string());
        m
    }

    #[test]
    fn test_format_parsing_aliases() {
        assert_eq!(
            "single".parse::<BracketFormat>().unwrap(),
            BracketFormat::SingleElimination
        );
        assert_eq!(
            "double-elimination".parse::<BracketFormat>().unwrap(),
            BracketFormat::DoubleElimination
        );
        assert_eq!(
            "pool-play".parse::<BracketFormat>().unwrap(),
            BracketFormat::PoolPlay
        );
        assert_eq!(
            " Swiss-System ".parse::<BracketFormat>().unwrap(),
            BracketFormat::SwissSystem
        );
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = "ladder".parse::<BracketFormat>().unwrap_err();
        assert_eq!(err, BracketError::UnsupportedFormat("ladder".to_string()));
    }

    #[test]
    fn test_format_serializes_as_tag() {
        let json = serde_json::to_string(&BracketFormat::PoolPlay).unwrap();
        assert_eq!(json, "\"pool-play-bracket\"");
        assert_eq!(BracketFormat::RoundRobin.to_string(), "round-robin");
    }

    #[test]
    fn test_match_loser() {
        let m = decided("A", "B", "B");
        assert_eq!(m.loser(), Some(&"A".to_string()));
        assert!(m.involves("A"));
        assert!(!m.involves("C"));
    }

    #[test]
    fn test_placeholder_and_bye() {
        let mut m = Match::placeholder("match-2".to_string(), "t", 2, 1);
        assert!(m.is_placeholder());
        assert!(!m.is_bye());

        m.participant_a = Some("A".to_string());
        m.winner = Some("A".to_string());
        m.status = MatchStatus::Completed;
        assert!(m.is_bye());
        assert_eq!(m.loser(), None);
    }

    #[test]
    fn test_default_advancement_rules() {
        let rules = AdvancementRules::default();
        assert_eq!(rules.advancement_type, AdvancementType::PoolWinners);
        assert_eq!(rules.count, Some(2));
        assert_eq!(
            rules.tiebreakers,
            vec![
                Tiebreaker::HeadToHead,
                Tiebreaker::PointDifferential,
                Tiebreaker::PointsFor
            ]
        );
    }

    #[test]
    fn test_match_ids_are_sequential() {
        let mut ids = MatchIds::default();
        assert_eq!(ids.next_id(), "match-1");
        assert_eq!(ids.next_id(), "match-2");

        let mut ids = MatchIds::starting_after(6);
        assert_eq!(ids.next_id(), "match-7");
    }
}
