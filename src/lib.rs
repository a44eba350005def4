//! Klondike solitaire game-state engine.
//!
//! The engine owns the 52-card board (stock, waste, seven columns, four
//! goals), enforces the move rules, records reversible history, hands out
//! hints, resolves double-clicks, and plays the game out automatically once
//! nothing is hidden any more. Rendering, persistence and statistics are
//! left to collaborators; they read views and receive `GameEvent`s.
//!
//! ```
//! use klondike_engine::{Command, EngineConfig, Game, Outcome};
//!
//! let mut game = Game::new(EngineConfig::default().with_seed(42));
//! let outcome = game.dispatch(Command::FlipDeck).unwrap();
//! assert!(matches!(outcome, Outcome::Applied(_)));
//! assert_eq!(game.game_moves(), 1);
//! ```

pub mod autocomplete;
pub mod board;
pub mod card;
pub mod column;
pub mod config;
pub mod coordinator;
pub mod deck;
pub mod display;
pub mod double_click;
pub mod error;
pub mod goal;
pub mod hint;
pub mod history;
pub mod moves;
pub mod pile;
pub mod scheduler;
pub mod selfplay;
pub mod snapshot;
pub mod stats;

pub use board::Board;
pub use card::{Card, CardId, PileId, Rank, Suit};
pub use config::{ConfigError, EngineConfig};
pub use coordinator::{
    Command, Game, GameEvent, Outcome, Phase, create_game, create_game_with_seed, resume_game,
};
pub use error::{GameError, Result};
pub use hint::Hint;
pub use moves::{GameMove, MoveIntent};
pub use snapshot::{BoardSnapshot, SavedGame};
pub use stats::{GameOverStats, Stats};
