//! Service layer: the rules applied between the HTTP handlers and the repository.
//!
//! Services are stateless functions taking an explicit repository handle.

pub mod game_saves;
pub mod scores;

use chrono::{NaiveDateTime, Utc};

/// Current wall-clock time used to default missing timestamps.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
