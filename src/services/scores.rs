//! Leaderboard score operations.

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{NewScoreRecord, SaveScoreRequest, ScoreRecord};

/// Record a score. No deduplication: every call adds a row.
pub async fn save_score(
    repo: &Repository,
    request: SaveScoreRequest,
) -> Result<ScoreRecord, AppError> {
    let record = NewScoreRecord {
        created_at: request.created_at.unwrap_or_else(super::now),
        player_name: request.player_name,
        score: request.score,
        level: request.level,
    };

    let saved = repo.insert_score_record(&record).await?;
    tracing::info!(
        score_id = saved.id,
        player = %saved.player_name,
        score = saved.score,
        "Recorded score"
    );
    Ok(saved)
}

/// Every score record, highest score first.
pub async fn get_all_scores(repo: &Repository) -> Result<Vec<ScoreRecord>, AppError> {
    repo.list_score_records().await
}

/// A player's score records, highest score first.
pub async fn get_scores_by_player_name(
    repo: &Repository,
    player_name: &str,
) -> Result<Vec<ScoreRecord>, AppError> {
    repo.list_score_records_by_player(player_name).await
}
