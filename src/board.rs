//! The canonical arrangement of all 52 cards across the 13 piles.
//!
//! `Board` bundles the three pile engines. It is the single source of truth
//! for the coordinator; every derived view (tops, runs, dragging flags,
//! hints) is recomputed from it on demand.

use std::collections::HashSet;

use crate::card::{CARDS_PER_DECK, Card, CardId, NUM_COLUMNS, NUM_GOALS, PileId};
use crate::column::ColumnEngine;
use crate::deck::DeckEngine;
use crate::error::GameError;
use crate::goal::GoalEngine;
use crate::pile::Pile;
use crate::snapshot::BoardSnapshot;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) deck: DeckEngine,
    pub(crate) columns: ColumnEngine,
    pub(crate) goals: GoalEngine,
}

impl Board {
    /// Deal a fresh game from a shuffled deck.
    ///
    /// Columns receive 1..=7 cards in column-major order (the first card
    /// goes to column 1, the next two to column 2, ...); only the top card
    /// of each column is face-up. The remaining 24 cards form the stock,
    /// with the last card of the deck on top.
    pub fn deal(cards: Vec<Card>) -> Self {
        let mut remaining = cards.into_iter();
        let mut columns: [Pile; NUM_COLUMNS] = Default::default();
        for (col, pile) in columns.iter_mut().enumerate() {
            for row in 0..=col {
                let Some(mut card) = remaining.next() else {
                    break;
                };
                card.set_flipped(row == col);
                card.set_field(PileId::Column(col as u8));
                pile.push(card);
            }
        }
        Board {
            deck: DeckEngine::new(remaining.collect()),
            columns: ColumnEngine::from_piles(columns),
            goals: GoalEngine::new(),
        }
    }

    pub fn deck(&self) -> &DeckEngine {
        &self.deck
    }

    pub fn columns(&self) -> &ColumnEngine {
        &self.columns
    }

    pub fn goals(&self) -> &GoalEngine {
        &self.goals
    }

    /// The pile behind an identifier, if it exists.
    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        match id {
            PileId::Deck => Some(self.deck.deck_pile()),
            PileId::Flipped => Some(self.deck.flipped_pile()),
            PileId::Column(i) => self.columns.column(i as usize),
            PileId::Goal(i) => self.goals.goal(i as usize),
        }
    }

    pub fn top(&self, id: PileId) -> Option<&Card> {
        self.pile(id)?.top()
    }

    /// The cards that move when card `id` in pile `source` is picked up.
    ///
    /// In a column that is the card and everything above it, which must
    /// form a run. On the waste and goal piles only the top card responds.
    /// Stock cards are never picked up.
    pub fn lift(&self, source: PileId, id: CardId) -> Result<Vec<Card>, GameError> {
        let stale = || GameError::StaleReference { pile: source, card: id };
        match source {
            PileId::Deck => Err(GameError::IllegalMove {
                from: source,
                to: source,
                reason: "face-down stock cards cannot be played".into(),
            }),
            PileId::Column(col) => {
                let col = col as usize;
                if !self.columns.column(col).is_some_and(|pile| pile.contains(id)) {
                    return Err(stale());
                }
                self.columns.run_from(col, id).ok_or_else(|| GameError::IllegalMove {
                    from: source,
                    to: source,
                    reason: format!("{id} does not head a movable run"),
                })
            }
            PileId::Flipped | PileId::Goal(_) => match self.top(source) {
                Some(card) if card.id() == id => Ok(vec![*card]),
                _ => Err(stale()),
            },
        }
    }

    pub fn card_count(&self) -> usize {
        self.deck.len() + self.columns.len() + self.goals.len()
    }

    pub fn is_won(&self) -> bool {
        self.goals.is_complete()
    }

    /// Check every structural invariant:
    ///   - the 13 piles hold exactly the 52 distinct cards
    ///   - each card's `field` names the pile it sits in
    ///   - stock face-down, waste and goals face-up
    ///   - column face-down prefix / face-up suffix
    ///   - goal piles single-suit, ascending from the ace
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(CARDS_PER_DECK as usize);
        for id in PileId::all() {
            let Some(pile) = self.pile(id) else {
                return Err(format!("missing pile {id}"));
            };
            for card in pile {
                if !seen.insert(card.id()) {
                    return Err(format!("duplicate card {card} in {id}"));
                }
                if card.field() != id {
                    return Err(format!("card {card} in {id} tagged as {}", card.field()));
                }
            }
        }
        if seen.len() != CARDS_PER_DECK as usize {
            return Err(format!("expected 52 cards, found {}", seen.len()));
        }
        if let Some(card) = self.deck.deck_pile().iter().find(|c| c.flipped()) {
            return Err(format!("face-up card {card} in deckPile"));
        }
        if let Some(card) = self.deck.flipped_pile().iter().find(|c| !c.flipped()) {
            return Err(format!("face-down card {card} in flippedPile"));
        }
        for col in 0..NUM_COLUMNS {
            if !self.columns.face_state_ok(col) {
                return Err(format!("face-down card above face-up card in {}", PileId::Column(col as u8)));
            }
        }
        for goal in 0..NUM_GOALS {
            let id = PileId::Goal(goal as u8);
            if let Some(card) = self.pile(id).and_then(|p| p.iter().find(|c| !c.flipped())) {
                return Err(format!("face-down card {card} in {id}"));
            }
            if !self.goals.ordering_ok(goal) {
                return Err(format!("{} is not an ascending single-suit pile", PileId::Goal(goal as u8)));
            }
        }
        Ok(())
    }

    pub fn to_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            deck_pile: self.deck.deck_pile().clone(),
            flipped_pile: self.deck.flipped_pile().clone(),
            columns: self.columns.columns().clone(),
            goals: self.goals.goals().clone(),
        }
    }

    /// Rebuild a board from a snapshot, validating every invariant.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Result<Self, String> {
        let board = Board {
            deck: DeckEngine::from_piles(snapshot.deck_pile, snapshot.flipped_pile),
            columns: ColumnEngine::from_piles(snapshot.columns),
            goals: GoalEngine::from_piles(snapshot.goals),
        };
        board.check_invariants()?;
        Ok(board)
    }
}
