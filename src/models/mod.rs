//! Data models for the Match-3 backend.
//!
//! Field names serialize in camelCase to match the game client.

mod game_save;
mod score_record;

pub use game_save::*;
pub use score_record::*;
