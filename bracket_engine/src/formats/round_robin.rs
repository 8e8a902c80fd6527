//! Round robin: every participant meets every other participant once.

use log::debug;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::bracket::{
    BracketError, BracketFormat, BracketResult, BracketStructure, Match, MatchIds, ParticipantId,
};

use super::{FormatGenerator, validate_participants};

/// How round robin pairings are spread over rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundRobinSchedule {
    /// Pairings in `i < j` order, `floor(n/2)` per round. A participant may
    /// appear twice in one round.
    #[default]
    Greedy,
    /// Circle method: one fixed participant, the rest rotate. Nobody plays
    /// twice in a round; odd fields give one participant a bye each round.
    Circle,
}

impl fmt::Display for RoundRobinSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundRobinSchedule::Greedy => write!(f, "greedy"),
            RoundRobinSchedule::Circle => write!(f, "circle"),
        }
    }
}

impl FromStr for RoundRobinSchedule {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(RoundRobinSchedule::Greedy),
            "circle" => Ok(RoundRobinSchedule::Circle),
            other => Err(BracketError::InvalidConfig(format!(
                "unknown round robin schedule: {other}"
            ))),
        }
    }
}

/// Every unordered pair once, in `i < j` order
pub(crate) fn round_robin_pairs(
    participants: &[ParticipantId],
) -> impl Iterator<Item = (&ParticipantId, &ParticipantId)> {
    participants
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| participants[i + 1..].iter().map(move |b| (a, b)))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundRobin {
    pub schedule: RoundRobinSchedule,
}

impl RoundRobin {
    fn greedy(participants: &[ParticipantId], tournament_id: &str) -> Vec<Match> {
        let per_round = (participants.len() / 2).max(1) as u32;
        let mut ids = MatchIds::default();
        let (mut round, mut position) = (1, 1);

        let mut matches = Vec::with_capacity(participants.len() * (participants.len() - 1) / 2);
        for (a, b) in round_robin_pairs(participants) {
            matches.push(Match::scheduled(
                ids.next_id(),
                tournament_id,
                round,
                position,
                a.clone(),
                b.clone(),
            ));

            if position == per_round {
                round += 1;
                position = 1;
            } else {
                position += 1;
            }
        }
        matches
    }

    fn circle(participants: &[ParticipantId], tournament_id: &str) -> Vec<Match> {
        let mut players: Vec<Option<&ParticipantId>> = participants.iter().map(Some).collect();
        if players.len() % 2 == 1 {
            players.push(None);
        }

        let size = players.len();
        let mut ids = MatchIds::default();
        let mut matches = Vec::with_capacity(participants.len() * (participants.len() - 1) / 2);

        for round in 1..size as u32 {
            let mut position = 1;
            for k in 0..size / 2 {
                if let (Some(a), Some(b)) = (players[k], players[size - 1 - k]) {
                    matches.push(Match::scheduled(
                        ids.next_id(),
                        tournament_id,
                        round,
                        position,
                        a.clone(),
                        b.clone(),
                    ));
                    position += 1;
                }
            }
            players[1..].rotate_right(1);
        }
        matches
    }
}

impl FormatGenerator for RoundRobin {
    fn format(&self) -> BracketFormat {
        BracketFormat::RoundRobin
    }

    fn generate(
        &self,
        participants: &[ParticipantId],
        tournament_id: &str,
    ) -> BracketResult<BracketStructure> {
        validate_participants(participants)?;

        let matches = match self.schedule {
            RoundRobinSchedule::Greedy => Self::greedy(participants, tournament_id),
            RoundRobinSchedule::Circle => Self::circle(participants, tournament_id),
        };
        let total_rounds = matches.iter().map(|m| m.round).max().unwrap_or(0);

        debug!(
            "Round robin ({}) for {} participant(s): {} match(es) over {} round(s)",
            self.schedule,
            participants.len(),
            matches.len(),
            total_rounds
        );

        Ok(BracketStructure::new(self.format(), matches, total_rounds))
    }
}
