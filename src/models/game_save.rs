//! Game save model: a snapshot of a player's board.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted in a serialized board state.
pub const MAX_BOARD_STATE_LEN: usize = 10_000;

/// A persisted board snapshot for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSave {
    pub id: i64,
    pub player_name: String,
    pub score: i32,
    pub level: i32,
    pub board_state: Option<String>,
    pub saved_at: NaiveDateTime,
    /// Whether this is the player's current save
    pub active: bool,
}

/// Request body for writing a new save.
///
/// `id` and the active flag are server-controlled; if a client sends them
/// they are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGameRequest {
    pub player_name: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub board_state: Option<String>,
    #[serde(default)]
    pub saved_at: Option<NaiveDateTime>,
}

/// A save ready for insertion, with defaults applied.
#[derive(Debug, Clone)]
pub struct NewGameSave {
    pub player_name: String,
    pub score: i32,
    pub level: i32,
    pub board_state: Option<String>,
    pub saved_at: NaiveDateTime,
}
