//! Score API endpoints.

use axum::{extract::State, Json};

use super::{ApiJson, ApiPath};
use crate::errors::AppError;
use crate::models::{SaveScoreRequest, ScoreRecord};
use crate::services::scores;
use crate::AppState;

/// POST /api/scores - Record a score.
pub async fn save_score(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SaveScoreRequest>,
) -> Result<Json<ScoreRecord>, AppError> {
    let saved = scores::save_score(&state.repo, request).await?;
    Ok(Json(saved))
}

/// GET /api/scores - The full leaderboard.
pub async fn list_scores(State(state): State<AppState>) -> Result<Json<Vec<ScoreRecord>>, AppError> {
    Ok(Json(scores::get_all_scores(&state.repo).await?))
}

/// GET /api/scores/player/:playerName - A player's scores.
pub async fn list_player_scores(
    State(state): State<AppState>,
    ApiPath(player_name): ApiPath<String>,
) -> Result<Json<Vec<ScoreRecord>>, AppError> {
    let records = scores::get_scores_by_player_name(&state.repo, &player_name).await?;
    Ok(Json(records))
}
