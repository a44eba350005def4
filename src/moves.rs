//! Move representation.
//!
//! A `MoveIntent` is what a collaborator (drag-and-drop, double-click,
//! hint follower, auto-complete) proposes. A `GameMove` is what the
//! coordinator records once the intent has been validated and applied; it
//! carries enough information to be reversed exactly.

use serde::{Deserialize, Serialize};

use crate::card::{Card, PileId};

/// A proposed transfer of `cards` from `source` to `target`.
///
/// `cards` is ordered bottom-to-top like the pile it comes from; for a
/// column run, `cards[0]` is the highest-rank card of the run. Cards are
/// matched against the board by identity, so stale copies are detected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub source: PileId,
    pub target: PileId,
    pub cards: Vec<Card>,
}

impl MoveIntent {
    pub fn new(source: PileId, target: PileId, cards: Vec<Card>) -> Self {
        MoveIntent {
            source,
            target,
            cards,
        }
    }
}

/// One applied, reversible state transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMove {
    pub source: PileId,
    pub target: PileId,
    /// The moved cards as they were before the move, bottom-to-top.
    pub cards: Vec<Card>,
    /// Removing the cards revealed a face-down card in the source column.
    #[serde(default)]
    pub movement_with_flip: bool,
}

/// Coarse classification of a recorded move, used when rewinding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Stock top turned onto the waste.
    DeckFlip,
    /// Waste recycled into the stock.
    DeckReset,
    /// Cards carried from one pile to another.
    Transfer,
}

impl GameMove {
    pub fn deck_flip(card: Card) -> Self {
        GameMove {
            source: PileId::Deck,
            target: PileId::Flipped,
            cards: vec![card],
            movement_with_flip: false,
        }
    }

    pub fn deck_reset() -> Self {
        GameMove {
            source: PileId::Flipped,
            target: PileId::Deck,
            cards: Vec::new(),
            movement_with_flip: false,
        }
    }

    pub fn kind(&self) -> MoveKind {
        match (self.source, self.target) {
            (PileId::Deck, PileId::Flipped) => MoveKind::DeckFlip,
            (PileId::Flipped, PileId::Deck) => MoveKind::DeckReset,
            _ => MoveKind::Transfer,
        }
    }

    /// Render the move for logs, e.g. `column3Pile: 8S..7H -> column5Pile`.
    pub fn describe(&self) -> String {
        match self.kind() {
            MoveKind::DeckFlip => match self.cards.first() {
                Some(card) => format!("Flip {card} from deckPile"),
                None => "Flip deckPile".to_string(),
            },
            MoveKind::DeckReset => "Reset deckPile from flippedPile".to_string(),
            MoveKind::Transfer => match (self.cards.first(), self.cards.last()) {
                (Some(first), Some(last)) if self.cards.len() > 1 => {
                    format!("{}: {}..{} -> {}", self.source, first, last, self.target)
                }
                (Some(first), _) => format!("{}: {} -> {}", self.source, first, self.target),
                _ => format!("{} -> {}", self.source, self.target),
            },
        }
    }
}
