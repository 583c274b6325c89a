//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for game saves and score records.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    tracing::debug!("Database ready at {:?}", db_path);
    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_save (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_name TEXT NOT NULL,
            score INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 0,
            board_state TEXT CHECK (board_state IS NULL OR length(board_state) <= 10000),
            saved_at TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS score_record (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_name TEXT NOT NULL,
            score INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one active save per player
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_game_save_active_player
            ON game_save(player_name) WHERE active = 1;
        CREATE INDEX IF NOT EXISTS idx_game_save_player_saved_at
            ON game_save(player_name, saved_at);
        CREATE INDEX IF NOT EXISTS idx_score_record_score ON score_record(score);
        CREATE INDEX IF NOT EXISTS idx_score_record_player ON score_record(player_name);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_file_and_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("match3.sqlite");

        let pool = init_database(&db_path, 2).await.unwrap();
        assert!(db_path.exists());

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('game_save', 'score_record') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["game_save", "score_record"]);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("match3.sqlite");

        let pool = init_database(&db_path, 1).await.unwrap();
        pool.close().await;

        init_database(&db_path, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_second_active_save_rejected_by_index() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("match3.sqlite"), 1)
            .await
            .unwrap();

        let insert = "INSERT INTO game_save (player_name, saved_at, active) VALUES ('Ann', '2024-01-01 00:00:00', 1)";
        sqlx::query(insert).execute(&pool).await.unwrap();
        assert!(sqlx::query(insert).execute(&pool).await.is_err());
    }
}
