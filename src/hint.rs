//! Advisory hints.
//!
//! Hints never mutate the board; they only name the pile to take from and,
//! for card moves, the pile to put on. A hint with no target means "flip
//! the deck" (or reset it, when the deck is empty and the waste is not).
//!
//! Candidates are scanned in priority order:
//!   1. waste top to a goal
//!   2. a column top to a goal
//!   3. a column's top run to another column
//!   4. waste top to a column
//!   5. the deck itself
//!
//! Asking again on the same position walks down the list, skipping hints
//! already shown, and wraps once every candidate has been shown.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::card::{NUM_COLUMNS, PileId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hint {
    pub source: PileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PileId>,
}

impl Hint {
    pub fn is_deck_action(&self) -> bool {
        self.target.is_none()
    }
}

/// Every hint available on `board`, best first.
pub fn candidates(board: &Board) -> Vec<Hint> {
    let mut hints = Vec::new();
    if board.is_won() {
        return hints;
    }
    let columns = board.columns();
    let goals = board.goals();

    if let Some(card) = board.deck().flipped_top()
        && let Some(goal) = goals.accepting_goal(card, None)
    {
        hints.push(Hint {
            source: PileId::Flipped,
            target: PileId::goal(goal),
        });
    }

    for col in 0..NUM_COLUMNS {
        let Some(card) = columns.top(col).filter(|c| c.flipped()) else {
            continue;
        };
        if let Some(goal) = goals.accepting_goal(card, None) {
            hints.push(Hint {
                source: PileId::Column(col as u8),
                target: PileId::goal(goal),
            });
        }
    }

    for col in 0..NUM_COLUMNS {
        let run = columns.top_run(col);
        if run.is_empty() {
            continue;
        }
        let whole = columns.is_whole_column(col, &run);
        let target = (0..NUM_COLUMNS)
            .filter(|&dst| dst != col)
            .filter(|&dst| !(whole && columns.column(dst).is_some_and(|p| p.is_empty())))
            .find(|&dst| columns.can_accept_run(dst, &run));
        if let Some(dst) = target {
            hints.push(Hint {
                source: PileId::Column(col as u8),
                target: PileId::column(dst),
            });
        }
    }

    if let Some(card) = board.deck().flipped_top()
        && let Some(dst) = columns.accepting_column(std::slice::from_ref(card), None)
    {
        hints.push(Hint {
            source: PileId::Flipped,
            target: PileId::column(dst),
        });
    }

    if !board.deck().is_empty() {
        hints.push(Hint {
            source: PileId::Deck,
            target: None,
        });
    }
    hints
}

/// The best hint not already in `shown`, wrapping to the best overall when
/// every candidate has been shown. `None` if no hint exists.
pub fn next_hint(board: &Board, shown: &[Hint]) -> Option<Hint> {
    let all = candidates(board);
    all.iter()
        .find(|hint| !shown.contains(hint))
        .or_else(|| all.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};
    use crate::column::ColumnEngine;
    use crate::deck::DeckEngine;
    use crate::goal::GoalEngine;
    use crate::pile::Pile;

    fn up(suit: Suit, rank: Rank, pile: PileId) -> Card {
        Card::new(suit, rank).with_state(true, pile)
    }

    fn board(waste: Vec<Card>, columns: Vec<(usize, Vec<Card>)>) -> Board {
        let mut piles: [Pile; NUM_COLUMNS] = Default::default();
        for (col, cards) in columns {
            piles[col] = Pile::from_cards(cards);
        }
        Board {
            deck: DeckEngine::from_piles(Pile::new(), Pile::from_cards(waste)),
            columns: ColumnEngine::from_piles(piles),
            goals: GoalEngine::new(),
        }
    }

    #[test]
    fn waste_ace_beats_everything() {
        let b = board(
            vec![up(Suit::Hearts, Rank::Ace, PileId::Flipped)],
            vec![(0, vec![up(Suit::Clubs, Rank::Ace, PileId::Column(0))])],
        );
        let hints = candidates(&b);
        assert_eq!(
            hints[0],
            Hint { source: PileId::Flipped, target: Some(PileId::Goal(0)) }
        );
        assert_eq!(
            hints[1],
            Hint { source: PileId::Column(0), target: Some(PileId::Goal(0)) }
        );
    }

    #[test]
    fn column_run_hint_skips_pointless_king_moves() {
        let b = board(
            Vec::new(),
            vec![
                (0, vec![up(Suit::Spades, Rank::King, PileId::Column(0))]),
                (
                    1,
                    vec![
                        Card::new(Suit::Clubs, Rank::Two).with_state(false, PileId::Column(1)),
                        up(Suit::Hearts, Rank::King, PileId::Column(1)),
                    ],
                ),
            ],
        );
        let hints = candidates(&b);
        assert_eq!(
            hints,
            vec![Hint { source: PileId::Column(1), target: Some(PileId::Column(2)) }]
        );
    }

    #[test]
    fn deck_hint_has_no_target() {
        let mut b = board(Vec::new(), Vec::new());
        b.deck = DeckEngine::new(vec![Card::new(Suit::Diamonds, Rank::Nine)]);
        let hint = next_hint(&b, &[]).unwrap();
        assert!(hint.is_deck_action());
        assert_eq!(hint.source, PileId::Deck);
        let json = serde_json::to_value(hint).unwrap();
        assert!(json.get("target").is_none());
    }

    #[test]
    fn no_hint_on_empty_position() {
        assert_eq!(next_hint(&board(Vec::new(), Vec::new()), &[]), None);
    }

    #[test]
    fn repeated_requests_cycle_through_candidates() {
        let b = board(
            vec![up(Suit::Hearts, Rank::Ace, PileId::Flipped)],
            vec![(3, vec![up(Suit::Clubs, Rank::Ace, PileId::Column(3))])],
        );
        let first = next_hint(&b, &[]).unwrap();
        let second = next_hint(&b, &[first]).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.source, PileId::Column(3));
        // The waste is not empty, so a deck reset is the last candidate.
        let third = next_hint(&b, &[first, second]).unwrap();
        assert!(third.is_deck_action());
        assert_eq!(next_hint(&b, &[first, second, third]), Some(first));
    }
}
