//! Persistence shapes handed to, and received from, the storage layer.
//!
//! The engine never touches storage itself. On a save request it produces a
//! `SavedGame`; on load, a `SavedGame` is the only input to a resume. Both
//! shapes are plain JSON-serializable data with camelCase keys.

use serde::{Deserialize, Serialize};

use crate::card::{NUM_COLUMNS, NUM_GOALS};
use crate::error::{GameError, Result};
use crate::pile::Pile;

/// The 13 piles, exactly as they sit on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub deck_pile: Pile,
    pub flipped_pile: Pile,
    pub columns: [Pile; NUM_COLUMNS],
    pub goals: [Pile; NUM_GOALS],
}

/// Everything the storage collaborator persists for a game in progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    #[serde(flatten)]
    pub board: BoardSnapshot,
    /// Whole seconds played so far.
    pub game_time: u64,
    pub game_moves: u32,
    pub n_hints: u32,
}

impl SavedGame {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| GameError::ResumeMismatch(e.to_string()))
    }

    /// Parse a saved game. Shape errors surface as `ResumeMismatch`; the
    /// board invariants are checked later, when the game is resumed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GameError::ResumeMismatch(e.to_string()))
    }
}
