//! The four foundation ("goal") piles.
//!
//! A goal pile has no fixed suit: the ace placed into an empty pile binds
//! it to that suit, and from then on only the next rank of the same suit
//! is accepted. The game is won when all four piles hold thirteen cards.

use crate::card::{Card, CardId, NUM_GOALS, NUM_RANKS, PileId, Rank, Suit};
use crate::pile::Pile;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GoalEngine {
    goals: [Pile; NUM_GOALS],
}

impl GoalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from saved piles exactly as given.
    pub fn from_piles(goals: [Pile; NUM_GOALS]) -> Self {
        GoalEngine { goals }
    }

    pub fn goal(&self, goal: usize) -> Option<&Pile> {
        self.goals.get(goal)
    }

    pub fn goals(&self) -> &[Pile; NUM_GOALS] {
        &self.goals
    }

    pub fn top(&self, goal: usize) -> Option<&Card> {
        self.goal(goal)?.top()
    }

    pub fn len(&self) -> usize {
        self.goals.iter().map(Pile::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The suit a pile is bound to, once it holds its ace.
    pub fn suit_of(&self, goal: usize) -> Option<Suit> {
        self.goal(goal)?.get(0).map(Card::suit)
    }

    /// Whether `card` may be placed on goal pile `goal`.
    ///
    /// Empty pile: only an ace. Otherwise the same suit as the top, exactly
    /// one rank higher.
    pub fn can_accept(&self, goal: usize, card: &Card) -> bool {
        let Some(pile) = self.goal(goal) else {
            return false;
        };
        match pile.top() {
            None => card.rank() == Rank::Ace,
            Some(top) => {
                top.suit() == card.suit() && top.rank_number() + 1 == card.rank_number()
            }
        }
    }

    /// First goal pile that accepts `card`, skipping `except`.
    pub fn accepting_goal(&self, card: &Card, except: Option<usize>) -> Option<usize> {
        (0..NUM_GOALS)
            .filter(|&goal| Some(goal) != except)
            .find(|&goal| self.can_accept(goal, card))
    }

    /// Goal-to-goal move check.
    ///
    /// The moving card is treated as already lifted from `from`, so the
    /// destination is judged without the card counting twice.
    pub fn can_swap(&self, from: usize, to: usize, card: &Card) -> bool {
        from != to
            && self.top(from).map(Card::id) == Some(card.id())
            && self.can_accept(to, card)
    }

    /// Append a card to a goal pile. Unchecked; see `can_accept`.
    pub fn append(&mut self, goal: usize, card: Card) -> bool {
        let Some(pile) = self.goals.get_mut(goal) else {
            return false;
        };
        let mut card = card;
        card.set_flipped(true);
        card.set_field(PileId::Goal(goal as u8));
        pile.push(card);
        true
    }

    /// Remove a card from a goal pile.
    ///
    /// Only the top can leave without breaking the ascending order, so any
    /// other card is treated as a stale reference and `None` is returned.
    pub fn remove(&mut self, goal: usize, id: CardId) -> Option<Card> {
        let pile = self.goals.get_mut(goal)?;
        if pile.top().map(Card::id) != Some(id) {
            return None;
        }
        pile.pop()
    }

    /// The win condition: every pile holds a complete suit.
    pub fn is_complete(&self) -> bool {
        self.goals
            .iter()
            .all(|pile| pile.len() == NUM_RANKS as usize)
    }

    /// Whether a pile is a single suit ascending by one from the ace.
    pub fn ordering_ok(&self, goal: usize) -> bool {
        self.goal(goal).is_some_and(|pile| {
            pile.iter().enumerate().all(|(i, card)| {
                card.rank_number() as usize == i + 1
                    && pile.get(0).map(Card::suit) == Some(card.suit())
            })
        })
    }
}
