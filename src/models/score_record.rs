//! Score record model: an immutable leaderboard entry.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A score achieved by a player at a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: i64,
    pub player_name: String,
    pub score: i32,
    pub level: i32,
    pub created_at: NaiveDateTime,
}

/// Request body for recording a score.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScoreRequest {
    pub player_name: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// A score record ready for insertion, with defaults applied.
#[derive(Debug, Clone)]
pub struct NewScoreRecord {
    pub player_name: String,
    pub score: i32,
    pub level: i32,
    pub created_at: NaiveDateTime,
}
