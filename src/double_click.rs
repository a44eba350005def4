//! Double-click resolution.
//!
//! A double-click names a card; the handler for the pile it sits in decides
//! where it should go. Handlers share a two-step contract:
//!
//! - `on_initiate` picks the first kind of destination to probe.
//! - `on_target_resolved` receives the probe result and either commits to a
//!   pile, falls back to another probe, or gives up.
//!
//! Precedence:
//!
//! | clicked pile | first probe | fallback   |
//! |--------------|-------------|------------|
//! | column, one card | any goal | any column |
//! | column, run  | any column  | none       |
//! | waste        | any goal    | any column |
//! | goal         | any column  | goal swap  |

use crate::board::Board;
use crate::card::{Card, CardId, NUM_COLUMNS, NUM_GOALS, PileId};
use crate::error::{GameError, Result};

/// A class of destination piles to search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    AnyGoal,
    AnyColumn,
    /// Another goal pile, for a card already on a goal.
    GoalSwap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Move(PileId),
    Fallback(Probe),
    NoMove,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DoubleClickHandler {
    Column { column: usize, cards: Vec<Card> },
    Deck { card: Card },
    Goal { goal: usize, card: Card },
}

impl DoubleClickHandler {
    /// Build the handler for a double-click on card `id` in pile `source`.
    pub fn for_card(board: &Board, source: PileId, id: CardId) -> Result<Self> {
        let cards = board.lift(source, id)?;
        if let PileId::Column(col) = source {
            return Ok(DoubleClickHandler::Column {
                column: col as usize,
                cards,
            });
        }
        let card = cards
            .first()
            .copied()
            .ok_or(GameError::StaleReference { pile: source, card: id })?;
        Ok(match source {
            PileId::Goal(g) => DoubleClickHandler::Goal {
                goal: g as usize,
                card,
            },
            _ => DoubleClickHandler::Deck { card },
        })
    }

    pub fn source(&self) -> PileId {
        match self {
            DoubleClickHandler::Column { column, .. } => PileId::Column(*column as u8),
            DoubleClickHandler::Deck { .. } => PileId::Flipped,
            DoubleClickHandler::Goal { goal, .. } => PileId::Goal(*goal as u8),
        }
    }

    /// The cards that would move, bottom-to-top.
    pub fn cards(&self) -> Vec<Card> {
        match self {
            DoubleClickHandler::Column { cards, .. } => cards.clone(),
            DoubleClickHandler::Deck { card } | DoubleClickHandler::Goal { card, .. } => {
                vec![*card]
            }
        }
    }

    pub fn on_initiate(&self) -> Probe {
        match self {
            DoubleClickHandler::Column { cards, .. } if cards.len() > 1 => Probe::AnyColumn,
            DoubleClickHandler::Column { .. } | DoubleClickHandler::Deck { .. } => Probe::AnyGoal,
            DoubleClickHandler::Goal { .. } => Probe::AnyColumn,
        }
    }

    pub fn on_target_resolved(&self, probe: Probe, found: Option<PileId>) -> Resolution {
        if let Some(target) = found {
            return Resolution::Move(target);
        }
        match (self, probe) {
            (DoubleClickHandler::Column { cards, .. }, Probe::AnyGoal) if cards.len() == 1 => {
                Resolution::Fallback(Probe::AnyColumn)
            }
            (DoubleClickHandler::Deck { .. }, Probe::AnyGoal) => Resolution::Fallback(Probe::AnyColumn),
            (DoubleClickHandler::Goal { .. }, Probe::AnyColumn) => Resolution::Fallback(Probe::GoalSwap),
            _ => Resolution::NoMove,
        }
    }

    /// Search `board` for a destination of the given class.
    pub fn probe(&self, board: &Board, probe: Probe) -> Option<PileId> {
        let cards = self.cards();
        let head = cards.first()?;
        match probe {
            Probe::AnyGoal => {
                if cards.len() != 1 {
                    return None;
                }
                board.goals().accepting_goal(head, None).and_then(PileId::goal)
            }
            Probe::AnyColumn => {
                let columns = board.columns();
                let (except, whole) = match self {
                    DoubleClickHandler::Column { column, cards } => {
                        (Some(*column), columns.is_whole_column(*column, cards))
                    }
                    _ => (None, false),
                };
                (0..NUM_COLUMNS)
                    .filter(|&col| Some(col) != except)
                    .filter(|&col| !(whole && columns.column(col).is_some_and(|p| p.is_empty())))
                    .find(|&col| columns.can_accept_run(col, &cards))
                    .and_then(PileId::column)
            }
            Probe::GoalSwap => {
                let DoubleClickHandler::Goal { goal, card } = self else {
                    return None;
                };
                (0..NUM_GOALS)
                    .find(|&to| board.goals().can_swap(*goal, to, card))
                    .and_then(PileId::goal)
            }
        }
    }

    /// Run the probe/resolve loop to completion.
    pub fn find_target(&self, board: &Board) -> Option<PileId> {
        let mut probe = self.on_initiate();
        loop {
            match self.on_target_resolved(probe, self.probe(board, probe)) {
                Resolution::Move(target) => return Some(target),
                Resolution::Fallback(next) => probe = next,
                Resolution::NoMove => return None,
            }
        }
    }
}
