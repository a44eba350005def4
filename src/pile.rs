//! Ordered card container shared by every pile engine.
//!
//! Storage convention: index 0 is the bottom of the pile, the last element
//! is the top. Lookups go by `CardId`, never by position alone, so a stale
//! reference from the UI simply fails to find its card.

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Pile { cards }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Position of the card with this identity, if present.
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id() == id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.position(id).is_some()
    }

    /// True if the cards form the top of this pile, in order.
    pub fn ends_with(&self, run: &[Card]) -> bool {
        run.len() <= self.cards.len()
            && self.cards[self.cards.len() - run.len()..]
                .iter()
                .zip(run)
                .all(|(a, b)| a.id() == b.id())
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub(crate) fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Card> {
        self.cards.last_mut()
    }

    /// Remove the card with this identity wherever it sits.
    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let idx = self.position(id)?;
        Some(self.cards.remove(idx))
    }

    /// Remove and return everything from `index` up to the top.
    pub(crate) fn split_off(&mut self, index: usize) -> Vec<Card> {
        if index >= self.cards.len() {
            return Vec::new();
        }
        self.cards.split_off(index)
    }

    pub(crate) fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }
}

impl<'a> IntoIterator for &'a Pile {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn sample() -> Pile {
        Pile::from_cards(vec![
            Card::new(Suit::Hearts, Rank::King),
            Card::new(Suit::Spades, Rank::Queen),
            Card::new(Suit::Hearts, Rank::Jack),
        ])
    }

    #[test]
    fn top_is_last_element() {
        let pile = sample();
        assert_eq!(pile.top().map(Card::id), Some(Card::new(Suit::Hearts, Rank::Jack).id()));
        assert_eq!(pile.len(), 3);
    }

    #[test]
    fn remove_by_identity_ignores_missing_cards() {
        let mut pile = sample();
        let missing = Card::new(Suit::Clubs, Rank::Two);
        assert_eq!(pile.remove(missing.id()), None);
        assert_eq!(pile.len(), 3);

        let queen = Card::new(Suit::Spades, Rank::Queen);
        assert_eq!(pile.remove(queen.id()).map(|c| c.id()), Some(queen.id()));
        assert_eq!(pile.len(), 2);
        assert!(!pile.contains(queen.id()));
    }

    #[test]
    fn ends_with_matches_top_run_only() {
        let pile = sample();
        let top_two = &pile.cards()[1..].to_vec();
        assert!(pile.ends_with(top_two));
        assert!(!pile.ends_with(&pile.cards()[..2]));
        assert!(pile.ends_with(&[]));
    }

    #[test]
    fn split_off_past_end_is_empty() {
        let mut pile = sample();
        assert!(pile.split_off(5).is_empty());
        assert_eq!(pile.split_off(1).len(), 2);
        assert_eq!(pile.len(), 1);
    }
}
