//! Stock (draw pile) and waste (flipped pile) handling.
//!
//! The deck engine owns two piles:
//!   - `deck_pile`: face-down stock, top is the next card to flip
//!   - `flipped_pile`: face-up waste, top is the only playable card
//!
//! No operation here changes the combined card count of the two piles;
//! cards enter or leave them only through the move coordinator.

use crate::card::{Card, CardId, PileId};
use crate::pile::Pile;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeckEngine {
    deck_pile: Pile,
    flipped_pile: Pile,
}

impl DeckEngine {
    /// Stock from a list of cards (last card is the top), empty waste.
    ///
    /// Every card is forced face-down and tagged as living in the deck.
    pub fn new(cards: Vec<Card>) -> Self {
        let mut deck_pile = Pile::new();
        for mut card in cards {
            card.set_flipped(false);
            card.set_field(PileId::Deck);
            deck_pile.push(card);
        }
        DeckEngine {
            deck_pile,
            flipped_pile: Pile::new(),
        }
    }

    /// Rebuild from saved piles exactly as given.
    pub fn from_piles(deck_pile: Pile, flipped_pile: Pile) -> Self {
        DeckEngine {
            deck_pile,
            flipped_pile,
        }
    }

    pub fn deck_pile(&self) -> &Pile {
        &self.deck_pile
    }

    pub fn flipped_pile(&self) -> &Pile {
        &self.flipped_pile
    }

    pub fn flipped_top(&self) -> Option<&Card> {
        self.flipped_pile.top()
    }

    /// Total number of cards across stock and waste.
    pub fn len(&self) -> usize {
        self.deck_pile.len() + self.flipped_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a reset is structurally possible (stock empty, waste not).
    pub fn can_reset(&self) -> bool {
        self.deck_pile.is_empty() && !self.flipped_pile.is_empty()
    }

    /// Move the top stock card onto the waste, face-up.
    ///
    /// Returns the flipped card, or `None` (and does nothing) if the stock
    /// is empty.
    pub fn flip_top(&mut self) -> Option<Card> {
        let mut card = self.deck_pile.pop()?;
        card.set_flipped(true);
        card.set_field(PileId::Flipped);
        self.flipped_pile.push(card);
        Some(card)
    }

    /// Recycle the waste into the stock.
    ///
    /// Only allowed when the stock is empty. The waste is turned over as a
    /// whole: the first card that was flipped becomes the new stock top,
    /// and every card goes face-down again. Returns whether anything moved.
    pub fn reset_from_waste(&mut self) -> bool {
        if !self.can_reset() {
            return false;
        }
        while let Some(mut card) = self.flipped_pile.pop() {
            card.set_flipped(false);
            card.set_field(PileId::Deck);
            self.deck_pile.push(card);
        }
        true
    }

    /// Remove the waste top.
    pub fn remove_top(&mut self) -> Option<Card> {
        self.flipped_pile.pop()
    }

    /// Remove a named card from the waste.
    ///
    /// Only the top card is ever playable, so anything else (including a
    /// card that already left the waste) is a stale reference and yields
    /// `None` without touching the pile.
    pub fn remove_specific(&mut self, id: CardId) -> Option<Card> {
        if self.flipped_pile.top().map(Card::id) != Some(id) {
            return None;
        }
        self.flipped_pile.pop()
    }

    /// Put a card back on top of the waste (undo of a waste move).
    pub(crate) fn return_to_waste(&mut self, mut card: Card) {
        card.set_flipped(true);
        card.set_field(PileId::Flipped);
        self.flipped_pile.push(card);
    }

    /// Undo of `flip_top`: the waste top goes back onto the stock.
    pub(crate) fn unflip_top(&mut self) -> Option<Card> {
        let mut card = self.flipped_pile.pop()?;
        card.set_flipped(false);
        card.set_field(PileId::Deck);
        self.deck_pile.push(card);
        Some(card)
    }

    /// Undo of `reset_from_waste`: turn the whole stock back into the
    /// waste, restoring the original waste order.
    pub(crate) fn undo_reset(&mut self) -> bool {
        if !self.flipped_pile.is_empty() || self.deck_pile.is_empty() {
            return false;
        }
        while let Some(mut card) = self.deck_pile.pop() {
            card.set_flipped(true);
            card.set_field(PileId::Flipped);
            self.flipped_pile.push(card);
        }
        true
    }
}
