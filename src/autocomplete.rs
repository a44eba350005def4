//! Automatic finishing loop.
//!
//! Once no column hides a face-down card, every remaining decision is
//! forced and the engine can play the game out by itself. Each step is one
//! of, in order of preference:
//!
//! 1. waste top to an accepting goal
//! 2. the first column top that a goal accepts
//! 3. flip the deck
//! 4. reset the deck, if a goal move happened since the last reset
//!
//! When none applies the loop has stalled: the exposed cards cannot all be
//! placed from this position.
//!
//! The coordinator drives the loop through the scheduler. `AutoCompleter`
//! only tracks the loop's own state: the busy flag that is raised while a
//! step's settle delay is outstanding, the token of the queued step, and
//! whether the loop has given up.

use std::time::Duration;

use crate::board::Board;
use crate::card::{NUM_COLUMNS, PileId};
use crate::config::EngineConfig;
use crate::scheduler::CancellationToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoStep {
    WasteToGoal { goal: usize },
    ColumnToGoal { column: usize, goal: usize },
    FlipDeck,
    ResetDeck,
}

impl AutoStep {
    pub fn is_goal_move(self) -> bool {
        matches!(self, AutoStep::WasteToGoal { .. } | AutoStep::ColumnToGoal { .. })
    }

    /// Source and target piles of the step.
    pub fn piles(self) -> (PileId, PileId) {
        match self {
            AutoStep::WasteToGoal { goal } => (PileId::Flipped, PileId::Goal(goal as u8)),
            AutoStep::ColumnToGoal { column, goal } => {
                (PileId::Column(column as u8), PileId::Goal(goal as u8))
            }
            AutoStep::FlipDeck => (PileId::Deck, PileId::Flipped),
            AutoStep::ResetDeck => (PileId::Flipped, PileId::Deck),
        }
    }

    /// How long the loop stays busy after this step. A reset also waits
    /// out its animation.
    pub fn settle_delay(self, config: &EngineConfig) -> Duration {
        match self {
            AutoStep::ResetDeck => config.reset_animation() + config.settle(),
            _ => config.settle(),
        }
    }
}

/// Whether the board is in the state where auto-complete may run: no
/// face-down column cards and not already won.
pub fn is_eligible(board: &Board) -> bool {
    board.columns().all_flipped() && !board.is_won()
}

/// The next automatic step, or `None` when the loop is exhausted.
///
/// `progress_since_reset` guards the recycle: a second reset without any
/// goal move in between would only loop forever.
pub fn next_step(board: &Board, progress_since_reset: bool) -> Option<AutoStep> {
    let goals = board.goals();
    if let Some(card) = board.deck().flipped_top()
        && let Some(goal) = goals.accepting_goal(card, None)
    {
        return Some(AutoStep::WasteToGoal { goal });
    }
    for column in 0..NUM_COLUMNS {
        if let Some(card) = board.columns().top(column)
            && card.flipped()
            && let Some(goal) = goals.accepting_goal(card, None)
        {
            return Some(AutoStep::ColumnToGoal { column, goal });
        }
    }
    if !board.deck().deck_pile().is_empty() {
        return Some(AutoStep::FlipDeck);
    }
    if board.deck().can_reset() && progress_since_reset {
        return Some(AutoStep::ResetDeck);
    }
    None
}

/// Outcome of a synchronous auto-complete run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutoCompleteReport {
    /// Steps applied, deck flips and resets included.
    pub moves: u32,
    /// The run ended with the game won.
    pub completed: bool,
}

#[derive(Debug)]
pub struct AutoCompleter {
    busy: bool,
    pending: Option<CancellationToken>,
    progress_since_reset: bool,
    stalled: bool,
}

impl Default for AutoCompleter {
    fn default() -> Self {
        AutoCompleter {
            busy: false,
            pending: None,
            progress_since_reset: true,
            stalled: false,
        }
    }
}

impl AutoCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A step has been applied and its settle delay is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn progress_since_reset(&self) -> bool {
        self.progress_since_reset
    }

    /// Whether a new step may be queued right now.
    pub fn ready(&self) -> bool {
        !self.busy && !self.stalled && self.pending.is_none()
    }

    pub fn set_pending(&mut self, token: CancellationToken) {
        self.pending = Some(token);
    }

    /// Forget the queued step because it is running now.
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Raise the busy flag for an applied step.
    pub fn begin_step(&mut self, step: AutoStep) {
        self.busy = true;
        match step {
            AutoStep::ResetDeck => self.progress_since_reset = false,
            s if s.is_goal_move() => self.progress_since_reset = true,
            _ => {}
        }
    }

    /// The settle delay has elapsed.
    pub fn settle(&mut self) {
        self.busy = false;
    }

    pub fn mark_stalled(&mut self) {
        self.stalled = true;
    }

    /// Something other than the loop changed the board, so a stalled loop
    /// may have new moves.
    pub fn on_external_change(&mut self) {
        self.stalled = false;
        self.progress_since_reset = true;
    }

    /// Cancel the queued step, if any. An outstanding settle delay keeps
    /// the loop busy.
    pub fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Cancel the queued step and drop the busy flag; the loop is over.
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.busy = false;
    }

    pub fn reset(&mut self) {
        self.stop();
        *self = Self::default();
    }
}
