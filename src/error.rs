//! Error types for the game engine.

use thiserror::Error;

use crate::card::{CardId, PileId};

/// Why a command could not be carried out.
///
/// None of these are fatal: the board is left exactly as it was before the
/// command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The move breaks a rule (wrong rank, colour, suit, broken run, ...).
    #[error("illegal move from {from} to {to}: {reason}")]
    IllegalMove {
        from: PileId,
        to: PileId,
        reason: String,
    },

    /// The command names a card that is no longer where it was expected.
    #[error("card {card} is not movable from {pile}")]
    StaleReference { pile: PileId, card: CardId },

    /// A pile invariant would be broken. This is a programming error; the
    /// offending mutation is rolled back.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A saved game failed validation on load.
    #[error("saved game rejected: {0}")]
    ResumeMismatch(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    /// A re-entrancy guard rejected the command (drag, double-click or
    /// deck reset already in flight).
    #[error("engine busy: {0}")]
    Busy(&'static str),

    #[error("no drag in progress")]
    NoDragInProgress,

    /// Auto-complete was requested while a column still hides cards.
    #[error("auto-complete needs every column card face-up")]
    AutoCompleteUnavailable,

    /// The game is already won; only restart and read-only views remain.
    #[error("game is already finished")]
    GameFinished,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, GameError>;
