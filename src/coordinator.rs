//! The move coordinator: the only way to change a game.
//!
//! `Game` owns the board and everything that hangs off it (history, drag
//! state, hints, counters, scheduled tasks). Collaborators talk to it
//! through `Game::dispatch`, one `Command` at a time; each command runs to
//! completion before the next one is looked at, and `&mut self` makes any
//! interleaving impossible. Everything else is a read-only view.
//!
//! A card move goes through three phases:
//!
//! ```text
//!   Idle -> ValidatingMove -> Applying -> Idle
//! ```
//!
//! Validation consults the pile engines without touching the board. If it
//! fails, a `GameEvent::Rejected` is queued so the initiator can bounce the
//! cards back, and the error is returned. Otherwise the source pile gives
//! up the cards first and the target receives them second, the board
//! invariants are re-checked, and the move is recorded.
//!
//! Time-based continuations (auto-complete steps, the end of a deck reset
//! animation) are queued on a logical clock and run from `Command::Tick`.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::autocomplete::{self, AutoCompleteReport, AutoCompleter, AutoStep};
use crate::board::Board;
use crate::card::{Card, CardId, PileId, create_shuffled_deck};
use crate::column::is_valid_run;
use crate::config::EngineConfig;
use crate::double_click::DoubleClickHandler;
use crate::error::{GameError, Result};
use crate::hint::{self, Hint};
use crate::history::History;
use crate::moves::{GameMove, MoveIntent, MoveKind};
use crate::scheduler::{CancellationToken, Scheduler};
use crate::snapshot::SavedGame;
use crate::stats::GameOverStats;

/// Everything a collaborator may ask the engine to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the top stock card onto the waste.
    FlipDeck,
    /// Recycle the waste into the empty stock, after the reset animation.
    ResetDeck,
    /// Apply a fully formed move intent.
    Move(MoveIntent),
    /// Pick up `card` (and, in a column, everything above it).
    StartDrag { source: PileId, card: CardId },
    /// Release the lifted cards over `target`.
    Drop { target: PileId },
    /// Release the lifted cards anywhere that is not a pile.
    CancelDrag,
    DoubleClick { source: PileId, card: CardId },
    Undo,
    Redo,
    RequestHint,
    /// Advance the logical clock.
    Tick(Duration),
    /// Start the same deal over.
    Restart,
    /// Play the automatic finishing loop to the end right now.
    RunAutoComplete,
}

/// What a successful command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied(GameMove),
    Undone(GameMove),
    Redone(GameMove),
    /// The command was accepted and will complete on a later tick.
    Scheduled,
    Lifted(Vec<Card>),
    Cancelled,
    Hint(Option<Hint>),
    /// A clock advance; carries the number of scheduled tasks that ran.
    Ticked(usize),
    Restarted,
    AutoCompleted(AutoCompleteReport),
}

/// Notifications for observers, collected until `Game::drain_events`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    MoveApplied(GameMove),
    MoveUndone(GameMove),
    MoveRedone(GameMove),
    /// A move attempt failed; the cards stay where they were.
    Rejected {
        source: PileId,
        target: PileId,
        cards: Vec<Card>,
    },
    DeckResetScheduled,
    HintShown(Hint),
    /// Emitted exactly once per game, when the last card reaches a goal.
    GameOver(GameOverStats),
    Restarted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ValidatingMove,
    Applying,
}

/// Cards currently lifted by a drag, with the pile they came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragState {
    pub source: PileId,
    pub cards: Vec<Card>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    AutoCompleteStep,
    AutoCompleteSettled,
    ApplyDeckReset,
}

/// Who asked for a forward move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    Player,
    AutoComplete,
}

#[derive(Debug)]
pub struct Game {
    board: Board,
    initial: Board,
    config: EngineConfig,
    history: History,
    phase: Phase,
    drag: Option<DragState>,
    scheduler: Scheduler<Task>,
    auto: AutoCompleter,
    reset_pending: Option<CancellationToken>,
    shown_hints: Vec<Hint>,
    last_hint: Option<Hint>,
    events: Vec<GameEvent>,
    game_moves: u32,
    n_hints: u32,
    /// Play time carried over from a resumed save.
    base_time: Duration,
    /// Logical time at which the current game started or was resumed.
    started_at: Duration,
    /// Logical time at which the game was won.
    stopped_at: Option<Duration>,
    finished: bool,
}

/// A fresh game with a random deal and default configuration.
pub fn create_game() -> Game {
    Game::new(EngineConfig::default())
}

/// A fresh game whose deal is reproducible from `seed`.
pub fn create_game_with_seed(seed: u64) -> Game {
    Game::new(EngineConfig::default().with_seed(seed))
}

/// Restore a saved game, or deal a new one if the save is rejected.
pub fn resume_game(saved: SavedGame) -> Game {
    Game::resume_or_new(saved, EngineConfig::default())
}

impl Game {
    /// Deal a new game. The deck is shuffled from `config.seed` when set,
    /// otherwise from the thread RNG.
    pub fn new(config: EngineConfig) -> Self {
        let deck = match config.seed {
            Some(seed) => create_shuffled_deck(&mut StdRng::seed_from_u64(seed)),
            None => create_shuffled_deck(&mut rand::rng()),
        };
        info!(seed = ?config.seed, "new game");
        Game::from_board(Board::deal(deck), config)
    }

    /// Deal a game from an explicit card order (first card to column 1,
    /// last card on top of the stock).
    pub fn from_deck(cards: Vec<Card>, config: EngineConfig) -> Result<Self> {
        let board = Board::deal(cards);
        board
            .check_invariants()
            .map_err(GameError::InvariantViolation)?;
        Ok(Game::from_board(board, config))
    }

    /// Restore a saved game exactly.
    ///
    /// The snapshot must pass every board invariant. Restart on a resumed
    /// game returns to the resumed position; the original deal is not part
    /// of the save.
    pub fn resume(saved: SavedGame, config: EngineConfig) -> Result<Self> {
        let board = Board::from_snapshot(saved.board).map_err(GameError::ResumeMismatch)?;
        let mut game = Game::from_board(board, config);
        game.base_time = Duration::from_secs(saved.game_time);
        game.game_moves = saved.game_moves;
        game.n_hints = saved.n_hints;
        info!(moves = saved.game_moves, seconds = saved.game_time, "game resumed");
        Ok(game)
    }

    /// `resume`, falling back to a new deal when the save is rejected.
    pub fn resume_or_new(saved: SavedGame, config: EngineConfig) -> Self {
        match Game::resume(saved, config.clone()) {
            Ok(game) => game,
            Err(err) => {
                warn!(%err, "saved game rejected, dealing a new game");
                Game::new(config)
            }
        }
    }

    fn from_board(board: Board, config: EngineConfig) -> Self {
        let finished = board.is_won();
        let mut game = Game {
            initial: board.clone(),
            board,
            config,
            history: History::new(),
            phase: Phase::Idle,
            drag: None,
            scheduler: Scheduler::new(),
            auto: AutoCompleter::new(),
            reset_pending: None,
            shown_hints: Vec::new(),
            last_hint: None,
            events: Vec::new(),
            game_moves: 0,
            n_hints: 0,
            base_time: Duration::ZERO,
            started_at: Duration::ZERO,
            stopped_at: finished.then_some(Duration::ZERO),
            finished,
        };
        game.reevaluate_auto_complete();
        game
    }

    // ----- views -----

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        !self.finished && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.finished && self.history.can_redo()
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Whether cards from `pile` are currently lifted.
    pub fn is_dragging_from(&self, pile: PileId) -> bool {
        self.drag.as_ref().is_some_and(|d| d.source == pile)
    }

    /// The hint to highlight, until the board next changes.
    pub fn last_hint(&self) -> Option<Hint> {
        self.last_hint
    }

    pub fn game_moves(&self) -> u32 {
        self.game_moves
    }

    pub fn n_hints(&self) -> u32 {
        self.n_hints
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn deck_reset_pending(&self) -> bool {
        self.reset_pending.is_some()
    }

    pub fn auto_complete_busy(&self) -> bool {
        self.auto.is_busy()
    }

    /// Whether the scheduled auto-complete loop has given up on this
    /// position.
    pub fn auto_complete_stalled(&self) -> bool {
        self.auto.is_stalled()
    }

    /// Logical time of the next scheduled task, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Play time, frozen once the game is won.
    pub fn elapsed(&self) -> Duration {
        let end = self.stopped_at.unwrap_or_else(|| self.scheduler.now());
        self.base_time.saturating_add(end.saturating_sub(self.started_at))
    }

    pub fn game_over_stats(&self) -> GameOverStats {
        GameOverStats {
            moves: self.game_moves,
            n_hints: self.n_hints,
            seconds: self.elapsed().as_secs(),
        }
    }

    /// The persistence payload for the storage collaborator.
    pub fn saved_game(&self) -> SavedGame {
        SavedGame {
            board: self.board.to_snapshot(),
            game_time: self.elapsed().as_secs(),
            game_moves: self.game_moves,
            n_hints: self.n_hints,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ----- command interface -----

    /// Run one command to completion.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        debug_assert_eq!(self.phase, Phase::Idle, "dispatch re-entered");
        let result = self.handle(command);
        self.phase = Phase::Idle;
        self.reevaluate_auto_complete();
        result
    }

    fn handle(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Tick(elapsed) => return Ok(Outcome::Ticked(self.tick(elapsed))),
            Command::Restart => return Ok(self.restart()),
            Command::RequestHint => return Ok(Outcome::Hint(self.request_hint())),
            _ => {}
        }
        if self.finished {
            return Err(GameError::GameFinished);
        }
        if self.reset_pending.is_some() {
            return Err(GameError::Busy("deck reset in progress"));
        }
        match command {
            Command::FlipDeck => self.flip_deck(Origin::Player).map(Outcome::Applied),
            Command::ResetDeck => self.request_deck_reset(),
            Command::Move(intent) => self.apply_intent(intent, Origin::Player).map(Outcome::Applied),
            Command::StartDrag { source, card } => self.start_drag(source, card),
            Command::Drop { target } => self.drop_on(target),
            Command::CancelDrag => match self.drag.take() {
                Some(drag) => {
                    debug!(source = %drag.source, cards = drag.cards.len(), "drag cancelled");
                    Ok(Outcome::Cancelled)
                }
                None => Err(GameError::NoDragInProgress),
            },
            Command::DoubleClick { source, card } => self.double_click(source, card),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::RunAutoComplete => self.run_auto_complete(),
            Command::Tick(_) | Command::Restart | Command::RequestHint => {
                unreachable!("handled above")
            }
        }
    }

    // ----- moves -----

    fn validate(&self, intent: &MoveIntent) -> Result<Vec<Card>> {
        let MoveIntent {
            source,
            target,
            cards,
        } = intent;
        let (source, target) = (*source, *target);
        let illegal = |reason: &str| GameError::IllegalMove {
            from: source,
            to: target,
            reason: reason.to_string(),
        };

        let Some(first) = cards.first() else {
            return Err(illegal("no cards to move"));
        };
        if source == target {
            return Err(illegal("source and target are the same pile"));
        }
        let pile = self.board.pile(source).ok_or_else(|| illegal("unknown source pile"))?;
        if !pile.ends_with(cards) {
            return Err(GameError::StaleReference {
                pile: source,
                card: first.id(),
            });
        }
        // The board's own copies, not whatever the caller held on to.
        let moving = pile.cards()[pile.len() - cards.len()..].to_vec();

        match source {
            PileId::Deck => return Err(illegal("stock cards must be flipped first")),
            PileId::Flipped | PileId::Goal(_) if moving.len() != 1 => {
                return Err(illegal("only the top card can move"));
            }
            PileId::Column(_) if !is_valid_run(&moving) => {
                return Err(illegal("cards are not a movable run"));
            }
            _ => {}
        }

        match target {
            PileId::Column(col) => {
                if !self.board.columns().can_accept_run(col as usize, &moving) {
                    return Err(illegal("column does not accept these cards"));
                }
            }
            PileId::Goal(goal) => {
                let [card] = moving.as_slice() else {
                    return Err(illegal("goal piles take one card at a time"));
                };
                let goals = self.board.goals();
                let accepted = match source {
                    PileId::Goal(from) => goals.can_swap(from as usize, goal as usize, card),
                    _ => goals.can_accept(goal as usize, card),
                };
                if !accepted {
                    return Err(illegal("goal does not accept this card"));
                }
            }
            PileId::Deck | PileId::Flipped => {
                return Err(illegal("cards cannot be placed on the deck"));
            }
        }
        Ok(moving)
    }

    /// Move `cards` off `source` and onto `target`. Source first, target
    /// second. Returns whether the source column revealed a card, or
    /// `None` if either side refused; the caller rolls back.
    fn transfer(&mut self, source: PileId, target: PileId, cards: &[Card]) -> Option<bool> {
        let (moved, revealed) = match source {
            PileId::Column(col) => {
                let revealed = self.board.columns.remove_run(col as usize, cards)?;
                (cards.to_vec(), revealed)
            }
            PileId::Flipped => {
                let [card] = cards else { return None };
                (vec![self.board.deck.remove_specific(card.id())?], false)
            }
            PileId::Goal(goal) => {
                let [card] = cards else { return None };
                (vec![self.board.goals.remove(goal as usize, card.id())?], false)
            }
            PileId::Deck => return None,
        };
        let placed = match target {
            PileId::Column(col) => self.board.columns.append_run(col as usize, &moved),
            PileId::Goal(goal) => match moved.as_slice() {
                [card] => self.board.goals.append(goal as usize, *card),
                _ => false,
            },
            PileId::Deck | PileId::Flipped => false,
        };
        placed.then_some(revealed)
    }

    fn apply_intent(&mut self, intent: MoveIntent, origin: Origin) -> Result<GameMove> {
        self.phase = Phase::ValidatingMove;
        let moving = match self.validate(&intent) {
            Ok(moving) => moving,
            Err(err) => {
                self.bounce(intent, &err);
                return Err(err);
            }
        };

        self.phase = Phase::Applying;
        let before = self.board.clone();
        let Some(revealed) = self.transfer(intent.source, intent.target, &moving) else {
            self.board = before;
            return Err(self.violation(format!(
                "validated transfer {} -> {} failed",
                intent.source, intent.target
            )));
        };
        self.verify(before)?;

        let mv = GameMove {
            source: intent.source,
            target: intent.target,
            cards: moving,
            movement_with_flip: revealed,
        };
        self.record_forward(mv.clone(), origin);
        Ok(mv)
    }

    fn flip_deck(&mut self, origin: Origin) -> Result<GameMove> {
        self.phase = Phase::ValidatingMove;
        let Some(&card) = self.board.deck().deck_pile().top() else {
            return Err(GameError::IllegalMove {
                from: PileId::Deck,
                to: PileId::Flipped,
                reason: "deck is empty".into(),
            });
        };
        self.phase = Phase::Applying;
        let before = self.board.clone();
        if self.board.deck.flip_top().is_none() {
            self.board = before;
            return Err(self.violation("flip of a non-empty deck failed".into()));
        }
        self.verify(before)?;
        let mv = GameMove::deck_flip(card);
        self.record_forward(mv.clone(), origin);
        Ok(mv)
    }

    fn request_deck_reset(&mut self) -> Result<Outcome> {
        if self.drag.is_some() {
            return Err(GameError::Busy("drag in progress"));
        }
        self.phase = Phase::ValidatingMove;
        self.check_resettable()?;
        if self.config.reset_animation_ms == 0 {
            return self.apply_deck_reset(Origin::Player).map(Outcome::Applied);
        }
        let (_, token) = self
            .scheduler
            .schedule(self.config.reset_animation(), Task::ApplyDeckReset);
        self.reset_pending = Some(token);
        self.events.push(GameEvent::DeckResetScheduled);
        debug!(delay_ms = self.config.reset_animation_ms, "deck reset scheduled");
        Ok(Outcome::Scheduled)
    }

    fn check_resettable(&self) -> Result<()> {
        if self.board.deck().can_reset() {
            Ok(())
        } else {
            Err(GameError::IllegalMove {
                from: PileId::Flipped,
                to: PileId::Deck,
                reason: "reset needs an empty deck and a non-empty waste".into(),
            })
        }
    }

    fn apply_deck_reset(&mut self, origin: Origin) -> Result<GameMove> {
        self.check_resettable()?;
        self.phase = Phase::Applying;
        let before = self.board.clone();
        if !self.board.deck.reset_from_waste() {
            self.board = before;
            return Err(self.violation("reset of a resettable deck failed".into()));
        }
        self.verify(before)?;
        let mv = GameMove::deck_reset();
        self.record_forward(mv.clone(), origin);
        Ok(mv)
    }

    fn record_forward(&mut self, mv: GameMove, origin: Origin) {
        debug!(mv = %mv.describe(), reveal = mv.movement_with_flip, ?origin, "move applied");
        self.history.record(mv.clone());
        self.game_moves += 1;
        self.board_changed();
        if origin == Origin::Player {
            self.auto.on_external_change();
        }
        self.events.push(GameEvent::MoveApplied(mv));
        self.check_game_over();
    }

    /// Transient state that only lives until the board changes.
    fn board_changed(&mut self) {
        self.drag = None;
        self.shown_hints.clear();
        self.last_hint = None;
    }

    fn bounce(&mut self, intent: MoveIntent, err: &GameError) {
        debug!(%err, source = %intent.source, target = %intent.target, "move rejected");
        if self.drag.as_ref().is_some_and(|d| d.source == intent.source) {
            self.drag = None;
        }
        self.events.push(GameEvent::Rejected {
            source: intent.source,
            target: intent.target,
            cards: intent.cards,
        });
    }

    /// Re-check the board after a mutation; roll back to `before` if any
    /// invariant broke.
    fn verify(&mut self, before: Board) -> Result<()> {
        match self.board.check_invariants() {
            Ok(()) => Ok(()),
            Err(reason) => {
                self.board = before;
                Err(self.violation(reason))
            }
        }
    }

    fn violation(&self, reason: String) -> GameError {
        error!(%reason, "invariant violation, mutation rolled back");
        if cfg!(debug_assertions) {
            panic!("invariant violation: {reason}");
        }
        GameError::InvariantViolation(reason)
    }

    fn check_game_over(&mut self) {
        if self.finished || !self.board.is_won() {
            return;
        }
        self.finished = true;
        self.stopped_at = Some(self.scheduler.now());
        self.auto.stop();
        self.scheduler.cancel_all();
        self.reset_pending = None;
        let stats = self.game_over_stats();
        info!(moves = stats.moves, hints = stats.n_hints, seconds = stats.seconds, "game won");
        self.events.push(GameEvent::GameOver(stats));
    }

    // ----- drag and double-click -----

    fn start_drag(&mut self, source: PileId, card: CardId) -> Result<Outcome> {
        if self.drag.is_some() {
            return Err(GameError::Busy("drag already in progress"));
        }
        let cards = self.board.lift(source, card)?;
        debug!(%source, cards = cards.len(), "drag started");
        self.drag = Some(DragState {
            source,
            cards: cards.clone(),
        });
        Ok(Outcome::Lifted(cards))
    }

    fn drop_on(&mut self, target: PileId) -> Result<Outcome> {
        let drag = self.drag.take().ok_or(GameError::NoDragInProgress)?;
        if target == drag.source {
            debug!(%target, "dropped on its own pile");
            return Ok(Outcome::Cancelled);
        }
        self.apply_intent(MoveIntent::new(drag.source, target, drag.cards), Origin::Player)
            .map(Outcome::Applied)
    }

    fn double_click(&mut self, source: PileId, card: CardId) -> Result<Outcome> {
        if self.drag.is_some() {
            return Err(GameError::Busy("drag in progress"));
        }
        self.phase = Phase::ValidatingMove;
        let handler = DoubleClickHandler::for_card(&self.board, source, card)?;
        match handler.find_target(&self.board) {
            Some(target) => {
                let intent = MoveIntent::new(handler.source(), target, handler.cards());
                self.apply_intent(intent, Origin::Player).map(Outcome::Applied)
            }
            None => {
                let err = GameError::IllegalMove {
                    from: source,
                    to: source,
                    reason: "no pile accepts this card".into(),
                };
                self.bounce(MoveIntent::new(source, source, handler.cards()), &err);
                Err(err)
            }
        }
    }

    // ----- history -----

    /// Reverse a recorded move on the board.
    fn rewind(&mut self, mv: &GameMove) -> Option<()> {
        match mv.kind() {
            MoveKind::DeckFlip => {
                let card = mv.cards.first()?;
                if self.board.deck().flipped_top().map(Card::id) != Some(card.id()) {
                    return None;
                }
                self.board.deck.unflip_top().map(|_| ())
            }
            MoveKind::DeckReset => self.board.deck.undo_reset().then_some(()),
            MoveKind::Transfer => {
                let taken = match mv.target {
                    PileId::Column(col) => self.board.columns.take_top(col as usize, &mv.cards)?,
                    PileId::Goal(goal) => {
                        let [card] = mv.cards.as_slice() else { return None };
                        vec![self.board.goals.remove(goal as usize, card.id())?]
                    }
                    PileId::Deck | PileId::Flipped => return None,
                };
                match (mv.source, taken.as_slice()) {
                    (PileId::Column(col), _) => {
                        if mv.movement_with_flip && !self.board.columns.hide_top(col as usize) {
                            return None;
                        }
                        self.board.columns.append_run(col as usize, &taken).then_some(())
                    }
                    (PileId::Flipped, [card]) => {
                        self.board.deck.return_to_waste(*card);
                        Some(())
                    }
                    (PileId::Goal(goal), [card]) => {
                        self.board.goals.append(goal as usize, *card).then_some(())
                    }
                    _ => None,
                }
            }
        }
    }

    /// Apply a recorded move forward again.
    fn replay(&mut self, mv: &GameMove) -> Option<()> {
        match mv.kind() {
            MoveKind::DeckFlip => {
                let card = mv.cards.first()?;
                if self.board.deck().deck_pile().top().map(Card::id) != Some(card.id()) {
                    return None;
                }
                self.board.deck.flip_top().map(|_| ())
            }
            MoveKind::DeckReset => self.board.deck.reset_from_waste().then_some(()),
            MoveKind::Transfer => {
                let revealed = self.transfer(mv.source, mv.target, &mv.cards)?;
                (revealed == mv.movement_with_flip).then_some(())
            }
        }
    }

    fn undo(&mut self) -> Result<Outcome> {
        let mv = self.history.pop_undo().ok_or(GameError::NothingToUndo)?;
        self.phase = Phase::Applying;
        let before = self.board.clone();
        if self.rewind(&mv).is_none() {
            self.board = before;
            let err = self.violation(format!("cannot undo {}", mv.describe()));
            self.history.push_undo(mv);
            return Err(err);
        }
        if let Err(err) = self.verify(before) {
            self.history.push_undo(mv);
            return Err(err);
        }
        debug!(mv = %mv.describe(), "move undone");
        self.history.push_redo(mv.clone());
        self.game_moves += 1;
        self.board_changed();
        self.auto.on_external_change();
        self.events.push(GameEvent::MoveUndone(mv.clone()));
        Ok(Outcome::Undone(mv))
    }

    fn redo(&mut self) -> Result<Outcome> {
        let mv = self.history.pop_redo().ok_or(GameError::NothingToRedo)?;
        self.phase = Phase::Applying;
        let before = self.board.clone();
        if self.replay(&mv).is_none() {
            self.board = before;
            let err = self.violation(format!("cannot redo {}", mv.describe()));
            self.history.push_redo(mv);
            return Err(err);
        }
        if let Err(err) = self.verify(before) {
            self.history.push_redo(mv);
            return Err(err);
        }
        debug!(mv = %mv.describe(), "move redone");
        self.history.push_undo(mv.clone());
        self.game_moves += 1;
        self.board_changed();
        self.auto.on_external_change();
        self.events.push(GameEvent::MoveRedone(mv.clone()));
        self.check_game_over();
        Ok(Outcome::Redone(mv))
    }

    // ----- hints -----

    fn request_hint(&mut self) -> Option<Hint> {
        if self.finished {
            return None;
        }
        let hint = hint::next_hint(&self.board, &self.shown_hints)?;
        if self.shown_hints.contains(&hint) {
            // Every candidate has been shown once; start the cycle over.
            self.shown_hints.clear();
        }
        self.shown_hints.push(hint);
        self.last_hint = Some(hint);
        self.n_hints += 1;
        debug!(source = %hint.source, target = ?hint.target, "hint");
        self.events.push(GameEvent::HintShown(hint));
        Some(hint)
    }

    // ----- clock and scheduled work -----

    fn tick(&mut self, elapsed: Duration) -> usize {
        let deadline = self.scheduler.now().saturating_add(elapsed);
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.run_task(task);
            self.reevaluate_auto_complete();
            ran += 1;
        }
        self.scheduler.settle_at(deadline);
        ran
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::ApplyDeckReset => {
                self.reset_pending = None;
                if let Err(err) = self.apply_deck_reset(Origin::Player) {
                    warn!(%err, "scheduled deck reset dropped");
                }
            }
            Task::AutoCompleteSettled => self.auto.settle(),
            Task::AutoCompleteStep => {
                self.auto.clear_pending();
                if self.finished || self.auto.is_busy() || !self.auto_complete_allowed() {
                    return;
                }
                let Some(step) = autocomplete::next_step(&self.board, self.auto.progress_since_reset())
                else {
                    info!(moves = self.game_moves, "auto-complete stalled");
                    self.auto.mark_stalled();
                    return;
                };
                self.auto.begin_step(step);
                match self.apply_auto_step(step) {
                    Ok(_) if !self.finished => {
                        let delay = step.settle_delay(&self.config);
                        self.scheduler.schedule(delay, Task::AutoCompleteSettled);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(%err, ?step, "auto-complete step failed");
                        self.auto.stop();
                        self.auto.mark_stalled();
                    }
                }
                self.phase = Phase::Idle;
            }
        }
    }

    fn apply_auto_step(&mut self, step: AutoStep) -> Result<GameMove> {
        match step {
            AutoStep::FlipDeck => self.flip_deck(Origin::AutoComplete),
            AutoStep::ResetDeck => self.apply_deck_reset(Origin::AutoComplete),
            AutoStep::WasteToGoal { .. } | AutoStep::ColumnToGoal { .. } => {
                let (source, target) = step.piles();
                let card = self.board.top(source).copied().ok_or(GameError::IllegalMove {
                    from: source,
                    to: target,
                    reason: "source pile is empty".into(),
                })?;
                self.apply_intent(MoveIntent::new(source, target, vec![card]), Origin::AutoComplete)
            }
        }
    }

    fn auto_complete_allowed(&self) -> bool {
        self.config.auto_complete
            && self.drag.is_none()
            && self.reset_pending.is_none()
            && autocomplete::is_eligible(&self.board)
    }

    /// Queue the next automatic step if the loop should be running, or
    /// cancel a queued one if it no longer should.
    fn reevaluate_auto_complete(&mut self) {
        if self.finished || !self.auto_complete_allowed() {
            self.auto.cancel_pending();
            return;
        }
        if self.auto.ready() {
            let (_, token) = self
                .scheduler
                .schedule(self.config.tick(), Task::AutoCompleteStep);
            self.auto.set_pending(token);
        }
    }

    fn run_auto_complete(&mut self) -> Result<Outcome> {
        if self.drag.is_some() {
            return Err(GameError::Busy("drag in progress"));
        }
        if self.auto.is_busy() {
            return Err(GameError::Busy("auto-complete settling"));
        }
        if !autocomplete::is_eligible(&self.board) {
            return Err(GameError::AutoCompleteUnavailable);
        }
        self.auto.cancel_pending();
        let mut report = AutoCompleteReport::default();
        let mut progress = true;
        while !self.finished {
            let Some(step) = autocomplete::next_step(&self.board, progress) else {
                break;
            };
            if step == AutoStep::ResetDeck {
                progress = false;
            } else if step.is_goal_move() {
                progress = true;
            }
            self.apply_auto_step(step)?;
            report.moves += 1;
        }
        report.completed = self.finished;
        if !report.completed {
            self.auto.mark_stalled();
        }
        info!(moves = report.moves, completed = report.completed, "auto-complete run");
        Ok(Outcome::AutoCompleted(report))
    }

    fn restart(&mut self) -> Outcome {
        self.scheduler.cancel_all();
        self.auto.reset();
        self.board = self.initial.clone();
        self.history.clear();
        self.board_changed();
        self.reset_pending = None;
        self.game_moves = 0;
        self.n_hints = 0;
        self.base_time = Duration::ZERO;
        self.started_at = self.scheduler.now();
        self.finished = self.board.is_won();
        self.stopped_at = self.finished.then(|| self.scheduler.now());
        info!("game restarted");
        self.events.push(GameEvent::Restarted);
        Outcome::Restarted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit, standard_deck};

    fn quiet() -> EngineConfig {
        EngineConfig::default()
            .with_auto_complete(false)
            .with_reset_animation_ms(0)
    }

    /// The unshuffled deck: column 1 holds AH, column 2 holds 2H (down)
    /// under 3H, ... and the stock top is KD.
    fn fixed_game() -> Game {
        Game::from_deck(standard_deck(), quiet()).unwrap()
    }

    fn id(suit: Suit, rank: Rank) -> CardId {
        Card::new(suit, rank).id()
    }

    #[test]
    fn double_click_sends_an_ace_home() {
        let mut game = fixed_game();
        let outcome = game
            .dispatch(Command::DoubleClick {
                source: PileId::Column(0),
                card: id(Suit::Hearts, Rank::Ace),
            })
            .unwrap();
        let Outcome::Applied(mv) = outcome else {
            panic!("expected a move, got {outcome:?}");
        };
        assert_eq!(mv.target, PileId::Goal(0));
        assert!(game.board().columns().column(0).unwrap().is_empty());
        assert_eq!(game.game_moves(), 1);
        assert!(matches!(
            game.drain_events().as_slice(),
            [GameEvent::MoveApplied(_)]
        ));
    }

    #[test]
    fn rejected_move_bounces_back_without_mutation() {
        let mut game = fixed_game();
        let before = game.board().clone();
        let three = *game.board().top(PileId::Column(1)).unwrap();
        let intent = MoveIntent::new(PileId::Column(1), PileId::Goal(0), vec![three]);

        let err = game.dispatch(Command::Move(intent.clone())).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));
        assert_eq!(game.board(), &before);
        assert_eq!(game.game_moves(), 0);
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::Rejected {
                source: PileId::Column(1),
                target: PileId::Goal(0),
                cards: vec![three],
            }]
        );
    }

    #[test]
    fn stale_cards_are_reported() {
        let mut game = fixed_game();
        let buried = *game.board().pile(PileId::Column(2)).unwrap().get(0).unwrap();
        let err = game
            .dispatch(Command::Move(MoveIntent::new(
                PileId::Column(2),
                PileId::Column(3),
                vec![buried],
            )))
            .unwrap_err();
        assert!(matches!(err, GameError::StaleReference { .. }));
    }

    #[test]
    fn flip_undo_redo_restore_exact_boards() {
        let mut game = fixed_game();
        let pre = game.board().clone();
        let flip = game.dispatch(Command::FlipDeck).unwrap();
        assert!(matches!(flip, Outcome::Applied(ref mv) if mv.kind() == MoveKind::DeckFlip));
        let post = game.board().clone();
        assert_eq!(post.deck().flipped_top().map(Card::id), Some(id(Suit::Diamonds, Rank::King)));

        game.dispatch(Command::Undo).unwrap();
        assert_eq!(game.board(), &pre);
        game.dispatch(Command::Redo).unwrap();
        assert_eq!(game.board(), &post);
        assert_eq!(game.game_moves(), 3);
        assert!(matches!(game.dispatch(Command::Redo), Err(GameError::NothingToRedo)));
    }

    /// Column 5 is JH QH KH AC 2C with only the 2C face-up. Moving the 2C
    /// onto the 3H reveals the AC; undo must turn it face-down again.
    #[test]
    fn undo_hides_a_revealed_card_again() {
        let mut game = fixed_game();
        let pre = game.board().clone();
        let two = *game.board().top(PileId::Column(4)).unwrap();
        let Outcome::Applied(mv) = game
            .dispatch(Command::Move(MoveIntent::new(
                PileId::Column(4),
                PileId::Column(1),
                vec![two],
            )))
            .unwrap()
        else {
            panic!("2C onto 3H is legal");
        };
        assert!(mv.movement_with_flip);
        let revealed = game.board().top(PileId::Column(4)).unwrap();
        assert_eq!(revealed.id(), id(Suit::Clubs, Rank::Ace));
        assert!(revealed.flipped());
        let post = game.board().clone();

        game.dispatch(Command::Undo).unwrap();
        assert_eq!(game.board(), &pre);
        assert!(!game.board().columns().column(4).unwrap().get(3).unwrap().flipped());
        game.dispatch(Command::Redo).unwrap();
        assert_eq!(game.board(), &post);

        // A fresh move forgets the redo stack.
        game.dispatch(Command::Undo).unwrap();
        game.dispatch(Command::FlipDeck).unwrap();
        assert!(!game.can_redo());
    }

    #[test]
    fn double_click_without_destination_is_rejected() {
        let mut game = fixed_game();
        let before = game.board().clone();
        let err = game
            .dispatch(Command::DoubleClick {
                source: PileId::Column(3),
                card: id(Suit::Hearts, Rank::Ten),
            })
            .unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));
        assert_eq!(game.board(), &before);
        assert!(matches!(game.drain_events().as_slice(), [GameEvent::Rejected { .. }]));
    }

    #[test]
    fn drag_lifts_runs_and_drop_on_source_cancels() {
        let mut game = fixed_game();
        let ace = id(Suit::Hearts, Rank::Ace);
        let lifted = game
            .dispatch(Command::StartDrag {
                source: PileId::Column(0),
                card: ace,
            })
            .unwrap();
        assert!(matches!(lifted, Outcome::Lifted(ref cards) if cards.len() == 1));
        assert!(game.is_dragging_from(PileId::Column(0)));
        assert!(matches!(
            game.dispatch(Command::StartDrag { source: PileId::Column(0), card: ace }),
            Err(GameError::Busy(_))
        ));
        assert!(matches!(
            game.dispatch(Command::DoubleClick { source: PileId::Column(0), card: ace }),
            Err(GameError::Busy(_))
        ));

        assert_eq!(
            game.dispatch(Command::Drop { target: PileId::Column(0) }).unwrap(),
            Outcome::Cancelled
        );
        assert!(game.drag().is_none());
        assert!(matches!(game.dispatch(Command::CancelDrag), Err(GameError::NoDragInProgress)));

        game.dispatch(Command::StartDrag { source: PileId::Column(0), card: ace })
            .unwrap();
        let applied = game.dispatch(Command::Drop { target: PileId::Goal(2) }).unwrap();
        assert!(matches!(applied, Outcome::Applied(ref mv) if mv.target == PileId::Goal(2)));
        assert!(game.drag().is_none());
    }

    #[test]
    fn failed_drop_clears_drag_and_bounces() {
        let mut game = fixed_game();
        let ace = id(Suit::Hearts, Rank::Ace);
        game.dispatch(Command::StartDrag { source: PileId::Column(0), card: ace })
            .unwrap();
        game.drain_events();
        assert!(game.dispatch(Command::Drop { target: PileId::Column(5) }).is_err());
        assert!(game.drag().is_none());
        assert!(matches!(game.drain_events().as_slice(), [GameEvent::Rejected { .. }]));
    }

    #[test]
    fn deck_reset_waits_for_its_animation() {
        let config = EngineConfig::default().with_auto_complete(false);
        let mut game = Game::from_deck(standard_deck(), config).unwrap();
        while game.board().deck().deck_pile().len() > 0 {
            game.dispatch(Command::FlipDeck).unwrap();
        }
        let waste_len = game.board().deck().flipped_pile().len();
        assert_eq!(game.dispatch(Command::ResetDeck).unwrap(), Outcome::Scheduled);
        assert!(game.deck_reset_pending());
        assert!(matches!(game.dispatch(Command::Undo), Err(GameError::Busy(_))));

        assert_eq!(game.dispatch(Command::Tick(Duration::from_millis(599))).unwrap(), Outcome::Ticked(0));
        assert_eq!(game.board().deck().deck_pile().len(), 0);
        assert_eq!(game.dispatch(Command::Tick(Duration::from_millis(1))).unwrap(), Outcome::Ticked(1));
        assert!(!game.deck_reset_pending());
        assert_eq!(game.board().deck().deck_pile().len(), waste_len);
        assert_eq!(game.history().last(), Some(&GameMove::deck_reset()));

        game.dispatch(Command::Undo).unwrap();
        assert_eq!(game.board().deck().flipped_pile().len(), waste_len);
    }

    #[test]
    fn reset_with_stock_left_is_illegal() {
        let mut game = fixed_game();
        game.dispatch(Command::FlipDeck).unwrap();
        assert!(matches!(
            game.dispatch(Command::ResetDeck),
            Err(GameError::IllegalMove { .. })
        ));
    }

    #[test]
    fn hints_count_cycle_and_clear_on_move() {
        let mut game = fixed_game();
        let Outcome::Hint(Some(first)) = game.dispatch(Command::RequestHint).unwrap() else {
            panic!("fixed deal has a hint");
        };
        assert_eq!(first.source, PileId::Column(0));
        assert_eq!(first.target, Some(PileId::Goal(0)));
        assert_eq!(game.last_hint(), Some(first));

        let Outcome::Hint(Some(second)) = game.dispatch(Command::RequestHint).unwrap() else {
            panic!("second hint");
        };
        assert_ne!(first, second);
        assert_eq!(game.n_hints(), 2);

        game.dispatch(Command::FlipDeck).unwrap();
        assert_eq!(game.last_hint(), None);
    }

    #[test]
    fn restart_restores_the_initial_deal() {
        let mut game = fixed_game();
        let initial = game.board().clone();
        game.dispatch(Command::FlipDeck).unwrap();
        game.dispatch(Command::RequestHint).unwrap();
        game.dispatch(Command::Tick(Duration::from_secs(3))).unwrap();
        assert_eq!(game.elapsed(), Duration::from_secs(3));

        assert_eq!(game.dispatch(Command::Restart).unwrap(), Outcome::Restarted);
        assert_eq!(game.board(), &initial);
        assert_eq!(game.game_moves(), 0);
        assert_eq!(game.n_hints(), 0);
        assert!(!game.can_undo());
        assert_eq!(game.elapsed(), Duration::ZERO);
    }

    #[test]
    fn save_and_resume_round_trip() {
        let mut game = fixed_game();
        game.dispatch(Command::FlipDeck).unwrap();
        game.dispatch(Command::RequestHint).unwrap();
        game.dispatch(Command::Tick(Duration::from_millis(2500))).unwrap();
        let saved = game.saved_game();
        assert_eq!(saved.game_time, 2);
        assert_eq!(saved.game_moves, 1);
        assert_eq!(saved.n_hints, 1);

        let resumed = Game::resume(saved.clone(), quiet()).unwrap();
        assert_eq!(resumed.saved_game(), saved);
        assert_eq!(resumed.board(), game.board());
    }

    #[test]
    fn broken_save_falls_back_to_a_new_game() {
        let mut saved = fixed_game().saved_game();
        saved.board.deck_pile.pop();
        assert!(matches!(
            Game::resume(saved.clone(), quiet()),
            Err(GameError::ResumeMismatch(_))
        ));
        let game = Game::resume_or_new(saved, quiet());
        assert_eq!(game.board().card_count(), 52);
        assert_eq!(game.game_moves(), 0);
    }

    #[test]
    fn free_constructors_deal_and_resume() {
        let game = create_game();
        assert_eq!(game.board().card_count(), 52);
        assert_eq!(game.game_moves(), 0);
        assert!(game.config().auto_complete);

        let a = create_game_with_seed(7);
        assert_eq!(a.board(), create_game_with_seed(7).board());

        let mut saved = a.saved_game();
        saved.game_moves = 4;
        let resumed = resume_game(saved);
        assert_eq!(resumed.board(), a.board());
        assert_eq!(resumed.game_moves(), 4);
    }

    #[test]
    fn resume_game_deals_fresh_on_a_bad_save() {
        let mut saved = create_game_with_seed(7).saved_game();
        saved.game_moves = 9;
        let card = saved.board.columns[6].pop().unwrap();
        saved.board.columns[5].push(card);
        let game = resume_game(saved);
        assert_eq!(game.board().card_count(), 52);
        assert_eq!(game.game_moves(), 0);
        assert!(game.board().check_invariants().is_ok());
    }

    #[test]
    fn huge_ticks_saturate_the_clock() {
        let mut game = Game::new(quiet().with_seed(3));
        assert_eq!(game.dispatch(Command::Tick(Duration::MAX)).unwrap(), Outcome::Ticked(0));
        assert_eq!(game.dispatch(Command::Tick(Duration::from_millis(1))).unwrap(), Outcome::Ticked(0));
        assert_eq!(game.elapsed(), Duration::MAX);
        assert!(matches!(game.dispatch(Command::FlipDeck), Ok(Outcome::Applied(_))));
    }

    #[test]
    fn resumed_play_time_saturates() {
        let mut saved = fixed_game().saved_game();
        saved.game_time = u64::MAX;
        let mut game = Game::resume(saved, quiet()).unwrap();
        game.dispatch(Command::Tick(Duration::from_secs(2))).unwrap();
        assert_eq!(game.saved_game().game_time, u64::MAX);
        assert_eq!(game.game_over_stats().seconds, u64::MAX);
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let a = Game::new(quiet().with_seed(11));
        let b = Game::new(quiet().with_seed(11));
        let c = Game::new(quiet().with_seed(12));
        assert_eq!(a.board(), b.board());
        assert_ne!(a.board(), c.board());
    }

    /// Everything on the goals except the top of the diamonds. `stock`
    /// and `columns` hold the missing diamonds, all visible except stock.
    fn endgame(stock: &[Rank], columns: &[(usize, Rank)]) -> SavedGame {
        let mut board = crate::snapshot::BoardSnapshot::default();
        let missing: Vec<Rank> = stock.iter().chain(columns.iter().map(|(_, r)| r)).copied().collect();
        for (goal, suit) in Suit::ALL.into_iter().enumerate() {
            for rank in Rank::ALL.into_iter().filter(|r| suit != Suit::Diamonds || !missing.contains(r)) {
                let pile = PileId::Goal(goal as u8);
                board.goals[goal].push(Card::new(suit, rank).with_state(true, pile));
            }
        }
        for &rank in stock {
            board.deck_pile.push(Card::new(Suit::Diamonds, rank).with_state(false, PileId::Deck));
        }
        for &(col, rank) in columns {
            let pile = PileId::Column(col as u8);
            board.columns[col].push(Card::new(Suit::Diamonds, rank).with_state(true, pile));
        }
        SavedGame {
            board,
            ..SavedGame::default()
        }
    }

    #[test]
    fn scheduled_auto_complete_finishes_the_game_once() {
        let saved = endgame(&[], &[(0, Rank::King), (1, Rank::Queen)]);
        let mut game = Game::resume(saved, EngineConfig::default()).unwrap();
        assert_eq!(game.next_due(), Some(Duration::from_millis(120)));

        // step at 120ms, settled at 170ms, step at 290ms
        assert_eq!(
            game.dispatch(Command::Tick(Duration::from_secs(5))).unwrap(),
            Outcome::Ticked(3)
        );
        assert!(game.is_finished());
        assert!(game.board().is_won());
        let events = game.drain_events();
        let overs: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver(stats) => Some(*stats),
                _ => None,
            })
            .collect();
        assert_eq!(overs, vec![GameOverStats { moves: 2, n_hints: 0, seconds: 0 }]);
        assert_eq!(game.next_due(), None);

        assert_eq!(game.dispatch(Command::Tick(Duration::from_secs(5))).unwrap(), Outcome::Ticked(0));
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn finished_game_only_allows_restart_and_views() {
        let saved = endgame(&[], &[(0, Rank::King)]);
        let mut game = Game::resume(saved, quiet()).unwrap();
        game.dispatch(Command::DoubleClick {
            source: PileId::Column(0),
            card: id(Suit::Diamonds, Rank::King),
        })
        .unwrap();
        assert!(game.is_finished());
        assert!(matches!(game.dispatch(Command::Undo), Err(GameError::GameFinished)));
        assert!(matches!(game.dispatch(Command::FlipDeck), Err(GameError::GameFinished)));
        assert_eq!(game.dispatch(Command::RequestHint).unwrap(), Outcome::Hint(None));
        assert!(!game.can_undo());

        game.dispatch(Command::Restart).unwrap();
        assert!(!game.is_finished());
        assert_eq!(game.board().top(PileId::Column(0)).map(Card::id), Some(id(Suit::Diamonds, Rank::King)));
    }

    #[test]
    fn run_auto_complete_plays_through_the_deck() {
        let saved = endgame(&[Rank::Queen, Rank::Jack], &[(3, Rank::King)]);
        let mut game = Game::resume(saved, quiet()).unwrap();
        let outcome = game.dispatch(Command::RunAutoComplete).unwrap();
        assert_eq!(
            outcome,
            Outcome::AutoCompleted(AutoCompleteReport { moves: 5, completed: true })
        );
        let events = game.drain_events();
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::GameOver(_))).count(), 1);
        assert!(matches!(game.dispatch(Command::RunAutoComplete), Err(GameError::GameFinished)));
    }

    #[test]
    fn player_move_during_settle_does_not_double_apply() {
        let saved = endgame(&[], &[(0, Rank::King), (1, Rank::Queen), (2, Rank::Jack)]);
        let mut game = Game::resume(saved, EngineConfig::default()).unwrap();
        // First automatic step (JD home) runs; its settle delay is pending.
        game.dispatch(Command::Tick(Duration::from_millis(120))).unwrap();
        assert!(game.auto_complete_busy());
        assert_eq!(game.board().goals().goal(3).unwrap().len(), 11);

        game.dispatch(Command::DoubleClick {
            source: PileId::Column(1),
            card: id(Suit::Diamonds, Rank::Queen),
        })
        .unwrap();
        assert!(game.auto_complete_busy());
        assert_eq!(game.board().goals().goal(3).unwrap().len(), 12);

        game.dispatch(Command::Tick(Duration::from_secs(5))).unwrap();
        assert!(game.is_finished());
        assert_eq!(game.game_moves(), 3);
    }

    #[test]
    fn explicit_auto_complete_waits_for_settle() {
        let saved = endgame(&[], &[(0, Rank::King), (1, Rank::Queen), (2, Rank::Jack)]);
        let mut game = Game::resume(saved, EngineConfig::default()).unwrap();
        game.dispatch(Command::Tick(Duration::from_millis(120))).unwrap();
        assert!(game.auto_complete_busy());
        let goal_before = game.board().goals().goal(3).unwrap().len();

        assert!(matches!(
            game.dispatch(Command::RunAutoComplete),
            Err(GameError::Busy(_))
        ));
        assert_eq!(game.board().goals().goal(3).unwrap().len(), goal_before);
        assert_eq!(game.game_moves(), 1);

        // settled at 170ms, next step queued for 290ms
        game.dispatch(Command::Tick(Duration::from_millis(60))).unwrap();
        assert!(!game.auto_complete_busy());
        let outcome = game.dispatch(Command::RunAutoComplete).unwrap();
        assert_eq!(
            outcome,
            Outcome::AutoCompleted(AutoCompleteReport { moves: 2, completed: true })
        );
        assert!(game.is_finished());
    }

    #[test]
    fn auto_complete_needs_a_clear_tableau() {
        let mut game = fixed_game();
        assert!(matches!(
            game.dispatch(Command::RunAutoComplete),
            Err(GameError::AutoCompleteUnavailable)
        ));
        assert!(!game.auto_complete_busy());
        assert_eq!(game.next_due(), None);
    }
}
