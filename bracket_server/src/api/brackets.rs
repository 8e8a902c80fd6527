//! Bracket API handlers.
//!
//! Brackets travel in the request body: the caller keeps the structure
//! returned by one call and sends it back with the next.
//!
//! # Examples
//!
//! Generate a bracket:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/brackets \
//!   -H "Content-Type: application/json" \
//!   -d '{"tournament_id": "spring-cup", "participants": ["A", "B", "C", "D"], "format": "single-elimination"}'
//! ```

use axum::{Json, extract::State};
use bracket_engine::{
    BracketFormat, BracketStructure, ParticipantId, advance_from_pools, advance_from_swiss,
    generate_bracket_with, pair_next_round, populate_bracket_stage, record_result,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState, check_participant_limit, request_id::RequestId, run_engine};
use crate::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub tournament_id: String,
    pub participants: Vec<ParticipantId>,
    pub format: String,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub pool_size: Option<usize>,
    #[serde(default)]
    pub swiss_rounds: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResultRequest {
    pub bracket: BracketStructure,
    pub match_id: String,
    pub score_a: i64,
    pub score_b: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PairRoundRequest {
    pub bracket: BracketStructure,
    pub participants: Vec<ParticipantId>,
    pub round: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub bracket: BracketStructure,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SwissAdvanceRequest {
    pub bracket: BracketStructure,
    pub participants: Vec<ParticipantId>,
    /// Qualifiers to seed into the playoff
    pub count: usize,
    /// Tournament id stamped on the playoff matches
    pub tournament_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub advancing: Vec<ParticipantId>,
    pub bracket: BracketStructure,
}

/// Generate a bracket.
///
/// Request overrides (`pool_size`, `swiss_rounds`, `seed`) are applied on top
/// of the server's configured generator defaults.
///
/// # Errors
///
/// - `400 Bad Request`: Unknown format, too few or too many participants,
///   duplicate participants, invalid pool size, or a round count the field
///   cannot play
pub async fn generate(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<BracketStructure>, ApiError> {
    check_participant_limit(
        &state,
        request_id.as_str(),
        "generate",
        request.participants.len(),
    )?;

    let mut config = state.config.bracket.clone();
    if let Some(pool_size) = request.pool_size {
        config.pool_size = pool_size;
    }
    if request.swiss_rounds.is_some() {
        config.swiss_rounds = request.swiss_rounds;
    }
    if request.seed.is_some() {
        config.seed = request.seed;
    }

    let participant_count = request.participants.len();
    let tournament_id = request.tournament_id.clone();
    let structure = run_engine(request_id.as_str(), "generate", move || {
        generate_bracket_with(
            &request.participants,
            &request.tournament_id,
            &request.format,
            request.sport.as_deref(),
            &config,
        )
    })
    .await?;

    metrics::brackets_generated_total(structure.format.as_str());
    metrics::bracket_matches(structure.total_matches);
    tracing::info!(
        request_id = %request_id.as_str(),
        tournament_id = %tournament_id,
        format = %structure.format,
        participants = participant_count,
        matches = structure.total_matches,
        "Bracket generated"
    );

    Ok(Json(structure))
}

/// Record a match result and progress the winner.
///
/// # Errors
///
/// - `404 Not Found`: No match with the given id
/// - `422 Unprocessable Entity`: Tied score, match already completed or
///   missing participants
pub async fn record(
    request_id: RequestId,
    Json(request): Json<RecordResultRequest>,
) -> Result<Json<BracketStructure>, ApiError> {
    let structure = run_engine(request_id.as_str(), "record_result", move || {
        record_result(
            request.bracket,
            &request.match_id,
            request.score_a,
            request.score_b,
        )
    })
    .await?;

    Ok(Json(structure))
}

/// Pair the next round of a Swiss event.
///
/// # Errors
///
/// - `400 Bad Request`: Not a Swiss bracket, round out of range or earlier
///   rounds still pending
/// - `422 Unprocessable Entity`: Round already paired
pub async fn pair_swiss_round(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<PairRoundRequest>,
) -> Result<Json<BracketStructure>, ApiError> {
    check_participant_limit(
        &state,
        request_id.as_str(),
        "pair_next_round",
        request.participants.len(),
    )?;

    let structure = run_engine(request_id.as_str(), "pair_next_round", move || {
        pair_next_round(request.bracket, &request.participants, request.round)
    })
    .await?;

    Ok(Json(structure))
}

/// Seed the qualifiers of a finished Swiss event into a single elimination playoff.
///
/// The top `count` by Swiss standings come back best first, with a seeded
/// bracket built from them.
///
/// # Errors
///
/// - `400 Bad Request`: Not a Swiss bracket, rounds still pending, or a
///   `count` below 2 or above the field size
pub async fn advance_swiss(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<SwissAdvanceRequest>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    check_participant_limit(
        &state,
        request_id.as_str(),
        "advance_from_swiss",
        request.participants.len(),
    )?;

    let config = state.config.bracket.clone();
    let (advancing, bracket) = run_engine(request_id.as_str(), "advance_from_swiss", move || {
        let advancing = advance_from_swiss(&request.bracket, &request.participants, request.count)?;
        let bracket = generate_bracket_with(
            &advancing,
            &request.tournament_id,
            BracketFormat::SeededSingleElimination.as_str(),
            None,
            &config,
        )?;
        Ok((advancing, bracket))
    })
    .await?;

    metrics::brackets_generated_total(bracket.format.as_str());
    metrics::bracket_matches(bracket.total_matches);
    Ok(Json(AdvanceResponse { advancing, bracket }))
}

/// Select the participants leaving pool play and seat them in the bracket stage.
///
/// # Errors
///
/// - `400 Bad Request`: Not a pool play bracket, or more advancing
///   participants than bracket slots
/// - `422 Unprocessable Entity`: Bracket stage already populated
pub async fn advance(
    request_id: RequestId,
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let (advancing, bracket) = run_engine(request_id.as_str(), "advance_from_pools", move || {
        let advancing = advance_from_pools(&request.bracket, request.seed)?;
        let bracket = populate_bracket_stage(request.bracket, &advancing)?;
        Ok((advancing, bracket))
    })
    .await?;

    Ok(Json(AdvanceResponse { advancing, bracket }))
}
