//! Game save API endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::{ApiJson, ApiPath};
use crate::errors::AppError;
use crate::models::{GameSave, SaveGameRequest};
use crate::services::game_saves;
use crate::AppState;

/// POST /api/saves - Save a game and make it the player's active save.
pub async fn save_game(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SaveGameRequest>,
) -> Result<Json<GameSave>, AppError> {
    let saved = game_saves::save_game(&state.repo, request).await?;
    Ok(Json(saved))
}

/// GET /api/saves/player/:playerName - List a player's saves, newest first.
pub async fn list_player_saves(
    State(state): State<AppState>,
    ApiPath(player_name): ApiPath<String>,
) -> Result<Json<Vec<GameSave>>, AppError> {
    let saves = game_saves::get_game_saves_by_player_name(&state.repo, &player_name).await?;
    Ok(Json(saves))
}

/// GET /api/saves/load/:playerName - Load the player's active save.
pub async fn load_game(
    State(state): State<AppState>,
    ApiPath(player_name): ApiPath<String>,
) -> Result<Json<GameSave>, AppError> {
    match game_saves::load_game(&state.repo, &player_name).await? {
        Some(save) => Ok(Json(save)),
        None => Err(AppError::NotFound(format!(
            "No active save for player {}",
            player_name
        ))),
    }
}

/// DELETE /api/saves/:id - Delete a save. Unknown IDs are not an error.
pub async fn delete_save(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    game_saves::delete_game_save(&state.repo, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/saves/player/:playerName - Delete all of a player's saves.
pub async fn delete_player_saves(
    State(state): State<AppState>,
    ApiPath(player_name): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    game_saves::delete_game_saves_by_player_name(&state.repo, &player_name).await?;
    Ok(StatusCode::NO_CONTENT)
}
