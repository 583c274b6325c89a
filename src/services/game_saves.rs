//! Game save operations, including the one-active-save-per-player rule.

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{GameSave, NewGameSave, SaveGameRequest, MAX_BOARD_STATE_LEN};

/// Persist a new save and make it the player's only active save.
///
/// The previous active save (if any) is deactivated and the new one is
/// inserted in the same transaction, so a failure leaves the player's
/// saves untouched.
pub async fn save_game(repo: &Repository, request: SaveGameRequest) -> Result<GameSave, AppError> {
    if let Some(board_state) = &request.board_state {
        let len = board_state.chars().count();
        if len > MAX_BOARD_STATE_LEN {
            return Err(AppError::Validation(format!(
                "boardState is {} characters, the limit is {}",
                len, MAX_BOARD_STATE_LEN
            )));
        }
    }

    let new_save = NewGameSave {
        saved_at: request.saved_at.unwrap_or_else(super::now),
        player_name: request.player_name,
        score: request.score,
        level: request.level,
        board_state: request.board_state,
    };

    // The UPDATE runs first so the transaction takes the write lock before reading anything
    let mut tx = repo.begin().await?;
    let deactivated = Repository::deactivate_active_saves(&mut tx, &new_save.player_name).await?;
    let saved = Repository::insert_game_save(&mut tx, &new_save).await?;
    tx.commit().await?;

    tracing::info!(
        save_id = saved.id,
        player = %saved.player_name,
        deactivated,
        "Saved game"
    );

    Ok(saved)
}

/// The player's active save, if any.
pub async fn load_game(repo: &Repository, player_name: &str) -> Result<Option<GameSave>, AppError> {
    repo.find_active_game_save(player_name).await
}

/// All saves of a player, newest first.
pub async fn get_game_saves_by_player_name(
    repo: &Repository,
    player_name: &str,
) -> Result<Vec<GameSave>, AppError> {
    repo.list_game_saves_by_player(player_name).await
}

/// Delete a save by ID. Deleting an unknown ID is not an error.
pub async fn delete_game_save(repo: &Repository, id: i64) -> Result<(), AppError> {
    let removed = repo.delete_game_save(id).await?;
    if removed == 0 {
        tracing::debug!(save_id = id, "Delete requested for unknown save");
    } else {
        tracing::info!(save_id = id, "Deleted game save");
    }
    Ok(())
}

/// Delete every save of a player. Returns how many were removed.
pub async fn delete_game_saves_by_player_name(
    repo: &Repository,
    player_name: &str,
) -> Result<u64, AppError> {
    let removed = repo.delete_game_saves_by_player(player_name).await?;
    tracing::info!(player = %player_name, removed, "Deleted player's game saves");
    Ok(removed)
}
