//! A simple hint-following player, used by the CLI driver.
//!
//! The player only talks to the engine through `Game::dispatch`, the same
//! way an interactive front end would. Each turn it tries the hint
//! candidates best first and keeps the first one that leads to a position
//! it has not seen before; a candidate that would repeat a position is
//! taken back with `Undo`. Once the tableau has no face-down cards left
//! the automatic finishing loop takes over.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::autocomplete;
use crate::board::Board;
use crate::card::PileId;
use crate::coordinator::{Command, Game, Outcome};
use crate::error::Result;
use crate::hint::{self, Hint};
use crate::moves::MoveIntent;
use crate::stats::GameOverStats;

/// How a self-played game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayResult {
    Won(GameOverStats),
    /// Every candidate leads back to a known position.
    Stuck,
    /// The step budget ran out first.
    OutOfSteps,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayReport {
    pub result: PlayResult,
    pub steps: usize,
}

impl PlayReport {
    pub fn is_win(&self) -> bool {
        matches!(self.result, PlayResult::Won(_))
    }
}

/// Turn a hint into the command that carries it out.
pub fn command_for_hint(board: &Board, hint: &Hint) -> Option<Command> {
    let Some(target) = hint.target else {
        return Some(if board.deck().deck_pile().is_empty() {
            Command::ResetDeck
        } else {
            Command::FlipDeck
        });
    };
    let cards = match (hint.source, target) {
        (PileId::Column(col), PileId::Column(_)) => board.columns().top_run(col as usize),
        (source, _) => vec![*board.top(source)?],
    };
    Some(Command::Move(MoveIntent::new(hint.source, target, cards)))
}

/// Play `game` until it is won, stuck, or `max_steps` commands have run.
pub fn play(game: &mut Game, max_steps: usize) -> Result<PlayReport> {
    let mut seen: HashSet<Board> = HashSet::new();
    seen.insert(game.board().clone());
    let mut steps = 0;

    let result = loop {
        if game.is_finished() {
            break PlayResult::Won(game.game_over_stats());
        }
        if steps >= max_steps {
            break PlayResult::OutOfSteps;
        }
        steps += 1;

        if autocomplete::is_eligible(game.board()) && !game.auto_complete_stalled() {
            if game.auto_complete_busy() {
                let settle = game.config().reset_animation() + game.config().settle();
                game.dispatch(Command::Tick(settle))?;
                continue;
            }
            if let Outcome::AutoCompleted(report) = game.dispatch(Command::RunAutoComplete)? {
                debug!(moves = report.moves, completed = report.completed, "auto-complete");
            }
            seen.insert(game.board().clone());
            continue;
        }

        if !try_candidates(game, &mut seen)? {
            break PlayResult::Stuck;
        }
    };

    info!(?result, steps, moves = game.game_moves(), "self-play finished");
    Ok(PlayReport { result, steps })
}

/// Apply the best candidate that reaches a new position. Returns false if
/// there is none.
fn try_candidates(game: &mut Game, seen: &mut HashSet<Board>) -> Result<bool> {
    for candidate in hint::candidates(game.board()) {
        let Some(command) = command_for_hint(game.board(), &candidate) else {
            continue;
        };
        if game.dispatch(command)? == Outcome::Scheduled {
            game.dispatch(Command::Tick(game.config().reset_animation()))?;
        }
        if game.is_finished() || seen.insert(game.board().clone()) {
            return Ok(true);
        }
        debug!(source = %candidate.source, "candidate repeats a position, taking it back");
        game.dispatch(Command::Undo)?;
    }
    Ok(false)
}
