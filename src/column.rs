//! The seven tableau columns.
//!
//! Each column keeps the face-state invariant: a (possibly empty) prefix of
//! face-down cards followed by a suffix of face-up cards. Cards only ever
//! leave from the top, and whenever that exposes a face-down card the
//! engine turns it face-up (the "reveal" rule).
//!
//! The engine only answers questions about, and mutates, its own columns;
//! moving cards to or from other piles is the coordinator's job.

use crate::card::{Card, CardId, NUM_COLUMNS, PileId, Rank, is_sequential};
use crate::pile::Pile;

/// True if the slice (bottom-to-top) is a movable run: non-empty, all
/// face-up, descending by exactly one rank with alternating colours.
pub fn is_valid_run(cards: &[Card]) -> bool {
    !cards.is_empty()
        && cards.iter().all(Card::flipped)
        && cards.windows(2).all(|pair| is_sequential(&pair[0], &pair[1]))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColumnEngine {
    columns: [Pile; NUM_COLUMNS],
}

impl ColumnEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from saved piles exactly as given.
    pub fn from_piles(columns: [Pile; NUM_COLUMNS]) -> Self {
        ColumnEngine { columns }
    }

    pub fn column(&self, col: usize) -> Option<&Pile> {
        self.columns.get(col)
    }

    pub fn columns(&self) -> &[Pile; NUM_COLUMNS] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Pile::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn top(&self, col: usize) -> Option<&Card> {
        self.column(col)?.top()
    }

    /// The maximal movable run at the top of a column.
    ///
    /// Empty if the column is empty or its top card is face-down.
    pub fn top_run(&self, col: usize) -> Vec<Card> {
        let Some(pile) = self.column(col) else {
            return Vec::new();
        };
        let cards = pile.cards();
        let mut start = cards.len();
        while start > 0 {
            let candidate = &cards[start - 1];
            if !candidate.flipped() {
                break;
            }
            if start < cards.len() && !is_sequential(candidate, &cards[start]) {
                break;
            }
            start -= 1;
        }
        cards[start..].to_vec()
    }

    /// The cards from `id` up to the top of the column, if they form a
    /// valid run. `None` when the card is not in this column or the
    /// sequence above it is broken.
    pub fn run_from(&self, col: usize, id: CardId) -> Option<Vec<Card>> {
        let pile = self.column(col)?;
        let start = pile.position(id)?;
        let run = &pile.cards()[start..];
        is_valid_run(run).then(|| run.to_vec())
    }

    /// Whether `run` may be appended to column `col`.
    ///
    /// An empty column takes only a run headed by a king. Otherwise the
    /// column top must be face-up and the run head must be one rank below
    /// it in the opposite colour. Broken runs are never accepted.
    pub fn can_accept_run(&self, col: usize, run: &[Card]) -> bool {
        let Some(pile) = self.column(col) else {
            return false;
        };
        if !is_valid_run(run) {
            return false;
        }
        let head = &run[0];
        match pile.top() {
            None => head.rank() == Rank::King,
            Some(top) => top.flipped() && is_sequential(top, head),
        }
    }

    /// First column (in index order, skipping `except`) that accepts `run`.
    pub fn accepting_column(&self, run: &[Card], except: Option<usize>) -> Option<usize> {
        (0..NUM_COLUMNS)
            .filter(|&col| Some(col) != except)
            .find(|&col| self.can_accept_run(col, run))
    }

    /// True if `run` is everything column `col` holds, so moving it to an
    /// empty column would only shuffle piles around.
    pub fn is_whole_column(&self, col: usize, run: &[Card]) -> bool {
        self.column(col)
            .is_some_and(|pile| pile.len() == run.len() && pile.ends_with(run))
    }

    /// Remove `cards` from the top of column `col`.
    ///
    /// The cards must be exactly the current top of the column (matched by
    /// identity); otherwise nothing changes and `None` is returned. On
    /// success returns whether a face-down card was revealed.
    pub fn remove_run(&mut self, col: usize, cards: &[Card]) -> Option<bool> {
        let pile = self.columns.get_mut(col)?;
        if cards.is_empty() || !pile.ends_with(cards) {
            return None;
        }
        pile.split_off(pile.len() - cards.len());
        let mut revealed = false;
        if let Some(top) = pile.top_mut()
            && !top.flipped()
        {
            top.set_flipped(true);
            revealed = true;
        }
        Some(revealed)
    }

    /// Append cards to the top of column `col`, keeping their face state.
    ///
    /// This is unchecked; callers decide legality with `can_accept_run`.
    pub fn append_run(&mut self, col: usize, cards: &[Card]) -> bool {
        let Some(pile) = self.columns.get_mut(col) else {
            return false;
        };
        pile.extend(cards.iter().map(|&c| {
            let mut c = c;
            c.set_field(PileId::Column(col as u8));
            c
        }));
        true
    }

    /// Take `cards` off the top without applying the reveal rule.
    ///
    /// Used when rewinding a move into this column.
    pub(crate) fn take_top(&mut self, col: usize, cards: &[Card]) -> Option<Vec<Card>> {
        let pile = self.columns.get_mut(col)?;
        if cards.is_empty() || !pile.ends_with(cards) {
            return None;
        }
        Some(pile.split_off(pile.len() - cards.len()))
    }

    /// Turn the top card face-down again (undo of a reveal).
    pub(crate) fn hide_top(&mut self, col: usize) -> bool {
        match self.columns.get_mut(col).and_then(Pile::top_mut) {
            Some(top) if top.flipped() => {
                top.set_flipped(false);
                true
            }
            _ => false,
        }
    }

    /// True when every card in every column is face-up, i.e. the tableau
    /// holds no hidden information. Empty columns count as face-up.
    pub fn all_flipped(&self) -> bool {
        self.columns.iter().flatten().all(Card::flipped)
    }

    /// Whether the column obeys the face-down prefix / face-up suffix rule.
    pub fn face_state_ok(&self, col: usize) -> bool {
        self.column(col).is_some_and(|pile| {
            let first_up = pile.iter().position(Card::flipped).unwrap_or(pile.len());
            pile.cards()[first_up..].iter().all(Card::flipped)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn up(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank).with_state(true, PileId::Column(0))
    }

    fn down(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank).with_state(false, PileId::Column(0))
    }

    fn engine_with(col: usize, cards: Vec<Card>) -> ColumnEngine {
        let mut columns: [Pile; NUM_COLUMNS] = Default::default();
        columns[col] = Pile::from_cards(cards);
        ColumnEngine::from_piles(columns)
    }

    /// 8S, 7H, 6C is a run; adding 5C breaks the colour alternation.
    #[test]
    fn valid_and_invalid_runs() {
        let cards = [
            up(Suit::Spades, Rank::Eight),
            up(Suit::Hearts, Rank::Seven),
            up(Suit::Clubs, Rank::Six),
            up(Suit::Clubs, Rank::Five),
        ];
        assert!(is_valid_run(&cards[0..3]));
        assert!(!is_valid_run(&cards[0..4]));
        assert!(!is_valid_run(&[]));
        assert!(!is_valid_run(&[down(Suit::Spades, Rank::Eight)]));
    }

    #[test]
    fn top_run_stops_at_face_down_and_breaks() {
        let engine = engine_with(
            0,
            vec![
                down(Suit::Diamonds, Rank::Two),
                up(Suit::Hearts, Rank::Ten),
                up(Suit::Spades, Rank::Eight),
                up(Suit::Hearts, Rank::Seven),
            ],
        );
        let run: Vec<Rank> = engine.top_run(0).iter().map(Card::rank).collect();
        assert_eq!(run, vec![Rank::Eight, Rank::Seven]);

        let hidden = engine_with(1, vec![down(Suit::Clubs, Rank::Four)]);
        assert!(hidden.top_run(1).is_empty());
        assert!(hidden.top_run(0).is_empty());
        assert!(hidden.top_run(99).is_empty());
    }

    #[test]
    fn empty_column_accepts_only_kings() {
        let engine = ColumnEngine::new();
        assert!(engine.can_accept_run(3, &[up(Suit::Spades, Rank::King)]));
        assert!(!engine.can_accept_run(3, &[up(Suit::Spades, Rank::Queen)]));
    }

    #[test]
    fn face_down_top_is_never_a_target() {
        let engine = engine_with(0, vec![down(Suit::Hearts, Rank::Eight)]);
        assert!(!engine.can_accept_run(0, &[up(Suit::Spades, Rank::Seven)]));

        let engine = engine_with(0, vec![up(Suit::Hearts, Rank::Eight)]);
        assert!(engine.can_accept_run(0, &[up(Suit::Spades, Rank::Seven)]));
        assert!(!engine.can_accept_run(0, &[up(Suit::Diamonds, Rank::Seven)]));
    }

    #[test]
    fn removing_last_face_up_card_reveals_the_next() {
        let mut engine = engine_with(
            0,
            vec![
                down(Suit::Hearts, Rank::Ace),
                down(Suit::Clubs, Rank::Two),
                up(Suit::Diamonds, Rank::Four),
            ],
        );
        let four = up(Suit::Diamonds, Rank::Four);
        assert_eq!(engine.remove_run(0, &[four]), Some(true));
        let col = engine.column(0).unwrap();
        assert_eq!(col.len(), 2);
        assert!(col.top().unwrap().flipped());
        assert!(!col.get(0).unwrap().flipped());
        assert!(engine.face_state_ok(0));
    }

    #[test]
    fn remove_run_rejects_cards_not_on_top() {
        let mut engine = engine_with(
            0,
            vec![up(Suit::Spades, Rank::Eight), up(Suit::Hearts, Rank::Seven)],
        );
        let before = engine.clone();
        assert_eq!(engine.remove_run(0, &[up(Suit::Spades, Rank::Eight)]), None);
        assert_eq!(engine.remove_run(0, &[up(Suit::Clubs, Rank::Two)]), None);
        assert_eq!(engine, before);
    }

    #[test]
    fn append_run_retags_cards() {
        let mut engine = ColumnEngine::new();
        assert!(engine.append_run(4, &[up(Suit::Spades, Rank::King)]));
        assert_eq!(engine.top(4).unwrap().field(), PileId::Column(4));
        assert!(!engine.append_run(7, &[up(Suit::Spades, Rank::King)]));
    }

    #[test]
    fn run_from_requires_unbroken_sequence() {
        let engine = engine_with(
            2,
            vec![
                up(Suit::Hearts, Rank::Ten),
                up(Suit::Spades, Rank::Eight),
                up(Suit::Hearts, Rank::Seven),
            ],
        );
        let eight = Card::new(Suit::Spades, Rank::Eight).id();
        let ten = Card::new(Suit::Hearts, Rank::Ten).id();
        assert_eq!(engine.run_from(2, eight).map(|r| r.len()), Some(2));
        assert_eq!(engine.run_from(2, ten), None);
        assert_eq!(engine.run_from(1, eight), None);
    }
}
