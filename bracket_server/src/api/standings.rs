//! Standings API handlers.

use axum::{Json, extract::State};
use bracket_engine::{
    Match, ParticipantId, SwissRecord, TeamRecord, compute_standings, compute_standings_strict,
    compute_swiss_standings,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState, check_participant_limit, request_id::RequestId, run_engine};
use crate::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsRequest {
    pub matches: Vec<Match>,
    /// Reject malformed completed matches instead of skipping them
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SwissStandingsRequest {
    pub participants: Vec<ParticipantId>,
    pub matches: Vec<Match>,
}

/// Compute standings over the completed matches in the body.
///
/// # Response
///
/// Returns `200 OK` with the records ranked by wins, then point differential,
/// then points for:
/// ```json
/// [
///   {"participant": "A", "wins": 1, "losses": 0, "points_for": 10,
///    "points_against": 5, "point_differential": 5, "games_played": 1}
/// ]
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Strict mode and a completed match is tied
///   or lacks a participant
pub async fn compute(
    request_id: RequestId,
    Json(request): Json<StandingsRequest>,
) -> Result<Json<Vec<TeamRecord>>, ApiError> {
    let standings = run_engine(request_id.as_str(), "compute_standings", move || {
        if request.strict {
            compute_standings_strict(&request.matches)
        } else {
            Ok(compute_standings(&request.matches))
        }
    })
    .await?;

    metrics::standings_computed_total();
    Ok(Json(standings))
}

/// Compute Swiss standings: points, Buchholz, game points, strength of schedule.
///
/// Every listed participant appears, played or not.
///
/// # Errors
///
/// - `400 Bad Request`: More participants than the configured limit
pub async fn compute_swiss(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<SwissStandingsRequest>,
) -> Result<Json<Vec<SwissRecord>>, ApiError> {
    check_participant_limit(
        &state,
        request_id.as_str(),
        "compute_swiss_standings",
        request.participants.len(),
    )?;

    let standings = run_engine(request_id.as_str(), "compute_swiss_standings", move || {
        Ok(compute_swiss_standings(&request.participants, &request.matches))
    })
    .await?;

    metrics::standings_computed_total();
    Ok(Json(standings))
}
