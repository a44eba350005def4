//! Human-readable rendering of a Klondike board.
//!
//! Face-down cards are shown as "XX" and face-up cards with their
//! `short_str()` rank/suit code. The layout is what the CLI driver prints
//! after every game, and what the debug logs show when a test fails.

use std::fmt::Write as _;

use crate::board::Board;
use crate::card::{Card, NUM_COLUMNS};
use crate::hint::Hint;

/// Format a single card the way a player would see it.
pub fn format_card_visible(card: &Card) -> String {
    if card.flipped() {
        card.short_str()
    } else {
        "XX".to_string()
    }
}

/// Render the goal row, showing only the top card of each pile.
///
///   - Empty goal: `[  ]`
///   - Non-empty: e.g. `[AH]`, `[7C]`, `[KD]`
///
/// Goals have no fixed suit, so the column a suit lands in depends on the
/// order its ace was played.
pub fn render_foundations(board: &Board) -> String {
    let mut s = String::from("Foundations: ");
    for goal in board.goals().goals() {
        match goal.top() {
            Some(card) => {
                let _ = write!(s, "[{}] ", card.short_str());
            }
            None => s.push_str("[  ] "),
        }
    }
    s.trim_end().to_string()
}

/// Render the stock (face-down) and waste (face-up) piles on one line.
///
/// Stock is shown as a count; the waste shows its top card and length.
pub fn render_stock_and_waste(board: &Board) -> String {
    let deck = board.deck();
    let mut s = match deck.deck_pile().len() {
        0 => String::from("Stock: [empty]"),
        n => format!("Stock: [{n} cards]"),
    };
    s.push_str("    ");
    match deck.flipped_top() {
        Some(top) => {
            let _ = write!(
                s,
                "Waste: [{}] ({} cards)",
                top.short_str(),
                deck.flipped_pile().len()
            );
        }
        None => s.push_str("Waste: [empty]"),
    }
    s
}

/// Render the seven columns as a multi-line string.
///
/// Each cell is four characters wide. Columns are top-justified: row 0
/// holds the bottom card of every column, and the last non-empty row of a
/// column is its playable top.
pub fn render_columns(board: &Board) -> String {
    let columns = board.columns().columns();
    let mut s = String::from("Columns:\n      ");
    for col in 0..NUM_COLUMNS {
        let _ = write!(s, " C{} ", col + 1);
    }
    s.push('\n');

    let max_height = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    for row in 0..max_height {
        s.push_str("      ");
        for pile in columns {
            match pile.get(row) {
                Some(card) => {
                    let _ = write!(s, "{:>3} ", format_card_visible(card));
                }
                None => s.push_str("    "),
            }
        }
        s.push('\n');
    }
    s
}

/// Render the whole board: goals, stock/waste, then columns.
pub fn render_board(board: &Board) -> String {
    format!(
        "{}\n{}\n\n{}",
        render_foundations(board),
        render_stock_and_waste(board),
        render_columns(board)
    )
}

pub fn print_board(board: &Board) {
    println!("{}", render_board(board));
}

/// One-line summary of every column's playable top, e.g.
/// `C1: 4S  C2: 2H  C3: --  ...`.
pub fn render_playing_edge(board: &Board) -> String {
    let mut s = String::from("Piles (playing edge):");
    for (col, pile) in board.columns().columns().iter().enumerate() {
        let top = pile.top().map_or_else(|| "--".to_string(), format_card_visible);
        let _ = write!(s, " C{}: {:>2} ", col + 1, top);
    }
    s.trim_end().to_string()
}

/// Describe a hint in words for the CLI.
pub fn render_hint(board: &Board, hint: &Hint) -> String {
    match hint.target {
        None if board.deck().deck_pile().is_empty() => "Hint: reset the deck".to_string(),
        None => "Hint: flip the deck".to_string(),
        Some(target) => match board.top(hint.source) {
            Some(card) => format!("Hint: {} from {} to {}", card.short_str(), hint.source, target),
            None => format!("Hint: {} to {}", hint.source, target),
        },
    }
}
