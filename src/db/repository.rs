//! Database repository for game saves and score records.
//!
//! Uses prepared statements; multi-step writes run on a caller-owned transaction.

use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::errors::AppError;
use crate::models::{GameSave, NewGameSave, NewScoreRecord, ScoreRecord};

const GAME_SAVE_COLUMNS: &str = "id, player_name, score, level, board_state, saved_at, active";
const SCORE_RECORD_COLUMNS: &str = "id, player_name, score, level, created_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Start a transaction on a pooled connection.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        Ok(self.pool.begin().await?)
    }

    // ==================== GAME SAVE OPERATIONS ====================

    /// Clear the active flag on every active save of a player.
    /// Returns the number of saves deactivated.
    pub async fn deactivate_active_saves(
        conn: &mut SqliteConnection,
        player_name: &str,
    ) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE game_save SET active = 0 WHERE player_name = ? AND active = 1")
                .bind(player_name)
                .execute(&mut *conn)
                .await?;

        Ok(result.rows_affected())
    }

    /// Insert a new save as the player's active one.
    pub async fn insert_game_save(
        conn: &mut SqliteConnection,
        save: &NewGameSave,
    ) -> Result<GameSave, AppError> {
        let result = sqlx::query(
            "INSERT INTO game_save (player_name, score, level, board_state, saved_at, active) VALUES (?, ?, ?, ?, ?, 1)",
        )
        .bind(&save.player_name)
        .bind(save.score)
        .bind(save.level)
        .bind(&save.board_state)
        .bind(save.saved_at)
        .execute(&mut *conn)
        .await?;

        Ok(GameSave {
            id: result.last_insert_rowid(),
            player_name: save.player_name.clone(),
            score: save.score,
            level: save.level,
            board_state: save.board_state.clone(),
            saved_at: save.saved_at,
            active: true,
        })
    }

    /// Get the active save of a player.
    pub async fn find_active_game_save(
        &self,
        player_name: &str,
    ) -> Result<Option<GameSave>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM game_save WHERE player_name = ? AND active = 1",
            GAME_SAVE_COLUMNS
        ))
        .bind(player_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(game_save_from_row))
    }

    /// List all saves of a player, newest first.
    pub async fn list_game_saves_by_player(
        &self,
        player_name: &str,
    ) -> Result<Vec<GameSave>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM game_save WHERE player_name = ? ORDER BY saved_at DESC, id DESC",
            GAME_SAVE_COLUMNS
        ))
        .bind(player_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(game_save_from_row).collect())
    }

    /// Delete a save by ID. Returns the number of rows removed (0 or 1).
    pub async fn delete_game_save(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM game_save WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every save of a player. Returns the number of rows removed.
    pub async fn delete_game_saves_by_player(&self, player_name: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM game_save WHERE player_name = ?")
            .bind(player_name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ==================== SCORE OPERATIONS ====================

    /// Insert a score record.
    pub async fn insert_score_record(
        &self,
        record: &NewScoreRecord,
    ) -> Result<ScoreRecord, AppError> {
        let result = sqlx::query(
            "INSERT INTO score_record (player_name, score, level, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.player_name)
        .bind(record.score)
        .bind(record.level)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(ScoreRecord {
            id: result.last_insert_rowid(),
            player_name: record.player_name.clone(),
            score: record.score,
            level: record.level,
            created_at: record.created_at,
        })
    }

    /// List every score record, highest score first.
    pub async fn list_score_records(&self) -> Result<Vec<ScoreRecord>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM score_record ORDER BY score DESC, created_at ASC, id ASC",
            SCORE_RECORD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(score_record_from_row).collect())
    }

    /// List the score records of a player, highest score first.
    pub async fn list_score_records_by_player(
        &self,
        player_name: &str,
    ) -> Result<Vec<ScoreRecord>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM score_record WHERE player_name = ? ORDER BY score DESC, created_at ASC, id ASC",
            SCORE_RECORD_COLUMNS
        ))
        .bind(player_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(score_record_from_row).collect())
    }
}

// Helper functions for row conversion

fn game_save_from_row(row: &sqlx::sqlite::SqliteRow) -> GameSave {
    let active: i32 = row.get("active");
    GameSave {
        id: row.get("id"),
        player_name: row.get("player_name"),
        score: row.get("score"),
        level: row.get("level"),
        board_state: row.get("board_state"),
        saved_at: row.get("saved_at"),
        active: active != 0,
    }
}

fn score_record_from_row(row: &sqlx::sqlite::SqliteRow) -> ScoreRecord {
    ScoreRecord {
        id: row.get("id"),
        player_name: row.get("player_name"),
        score: row.get("score"),
        level: row.get("level"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    use super::*;
    use crate::db::init_database;

    async fn test_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"), 2)
            .await
            .unwrap();
        (Repository::new(pool), temp_dir)
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn new_save(player: &str, level: i32, saved_at: NaiveDateTime) -> NewGameSave {
        NewGameSave {
            player_name: player.to_string(),
            score: level * 10,
            level,
            board_state: Some(format!("board-{}", level)),
            saved_at,
        }
    }

    async fn insert_active(repo: &Repository, save: &NewGameSave) -> GameSave {
        let mut tx = repo.begin().await.unwrap();
        Repository::deactivate_active_saves(&mut tx, &save.player_name)
            .await
            .unwrap();
        let saved = Repository::insert_game_save(&mut tx, save).await.unwrap();
        tx.commit().await.unwrap();
        saved
    }

    #[tokio::test]
    async fn test_insert_and_find_active() {
        let (repo, _dir) = test_repo().await;

        let saved = insert_active(&repo, &new_save("Ann", 1, at(10, 0))).await;
        assert!(saved.id > 0);
        assert!(saved.active);

        let found = repo.find_active_game_save("Ann").await.unwrap().unwrap();
        assert_eq!(found, saved);
        assert!(repo.find_active_game_save("Bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deactivate_counts_rows() {
        let (repo, _dir) = test_repo().await;
        insert_active(&repo, &new_save("Ann", 1, at(10, 0))).await;

        let mut tx = repo.begin().await.unwrap();
        let first = Repository::deactivate_active_saves(&mut tx, "Ann")
            .await
            .unwrap();
        let second = Repository::deactivate_active_saves(&mut tx, "Ann")
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert!(repo.find_active_game_save("Ann").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rolled_back_transaction_changes_nothing() {
        let (repo, _dir) = test_repo().await;
        let first = insert_active(&repo, &new_save("Ann", 1, at(10, 0))).await;

        let mut tx = repo.begin().await.unwrap();
        Repository::deactivate_active_saves(&mut tx, "Ann")
            .await
            .unwrap();
        Repository::insert_game_save(&mut tx, &new_save("Ann", 2, at(11, 0)))
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        let active = repo.find_active_game_save("Ann").await.unwrap().unwrap();
        assert_eq!(active.id, first.id);
        assert_eq!(repo.list_game_saves_by_player("Ann").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_saved_at_then_id() {
        let (repo, _dir) = test_repo().await;
        insert_active(&repo, &new_save("Ann", 1, at(9, 0))).await;
        insert_active(&repo, &new_save("Ann", 2, at(12, 0))).await;
        insert_active(&repo, &new_save("Ann", 3, at(10, 30))).await;
        // Same timestamp as level 2; inserted later, so listed before it
        insert_active(&repo, &new_save("Ann", 4, at(12, 0))).await;
        insert_active(&repo, &new_save("Bob", 1, at(13, 0))).await;

        let levels: Vec<i32> = repo
            .list_game_saves_by_player("Ann")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.level)
            .collect();
        assert_eq!(levels, vec![4, 2, 3, 1]);
    }

    #[tokio::test]
    async fn test_timestamps_round_trip_with_fraction() {
        let (repo, _dir) = test_repo().await;
        let saved_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_milli_opt(10, 0, 0, 125)
            .unwrap();
        insert_active(&repo, &new_save("Ann", 1, saved_at)).await;

        let found = repo.find_active_game_save("Ann").await.unwrap().unwrap();
        assert_eq!(found.saved_at, saved_at);
    }

    #[tokio::test]
    async fn test_delete_by_id_and_by_player() {
        let (repo, _dir) = test_repo().await;
        let a1 = insert_active(&repo, &new_save("Ann", 1, at(9, 0))).await;
        insert_active(&repo, &new_save("Ann", 2, at(10, 0))).await;
        insert_active(&repo, &new_save("Bob", 1, at(10, 0))).await;

        assert_eq!(repo.delete_game_save(a1.id).await.unwrap(), 1);
        assert_eq!(repo.delete_game_save(a1.id).await.unwrap(), 0);
        assert_eq!(repo.list_game_saves_by_player("Ann").await.unwrap().len(), 1);

        assert_eq!(repo.delete_game_saves_by_player("Ann").await.unwrap(), 1);
        assert!(repo.list_game_saves_by_player("Ann").await.unwrap().is_empty());
        assert_eq!(repo.list_game_saves_by_player("Bob").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_score_listing_order() {
        let (repo, _dir) = test_repo().await;
        for (player, score, minute) in [("Ann", 10, 0), ("Bob", 30, 1), ("Ann", 20, 2), ("Cid", 30, 3)] {
            repo.insert_score_record(&NewScoreRecord {
                player_name: player.to_string(),
                score,
                level: 1,
                created_at: at(10, minute),
            })
            .await
            .unwrap();
        }

        let all: Vec<(String, i32)> = repo
            .list_score_records()
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.player_name, r.score))
            .collect();
        assert_eq!(
            all,
            vec![
                ("Bob".to_string(), 30),
                ("Cid".to_string(), 30),
                ("Ann".to_string(), 20),
                ("Ann".to_string(), 10),
            ]
        );

        let ann: Vec<i32> = repo
            .list_score_records_by_player("Ann")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.score)
            .collect();
        assert_eq!(ann, vec![20, 10]);
    }
}
