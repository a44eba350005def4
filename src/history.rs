//! Undo/redo stacks of applied moves.
//!
//! A move lives on at most one of the two stacks. Recording a fresh forward
//! move clears the redo stack; replaying a move through redo does not.

use crate::moves::GameMove;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    undo: Vec<GameMove>,
    redo: Vec<GameMove>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new forward move; invalidates everything that could be
    /// redone.
    pub fn record(&mut self, mv: GameMove) {
        self.redo.clear();
        self.undo.push(mv);
    }

    pub fn pop_undo(&mut self) -> Option<GameMove> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<GameMove> {
        self.redo.pop()
    }

    /// Park an undone move so it can be redone.
    pub fn push_redo(&mut self, mv: GameMove) {
        self.redo.push(mv);
    }

    /// Put a move back on the undo stack, keeping the redo stack. Used by
    /// redo, and to restore a move whose undo failed.
    pub fn push_undo(&mut self, mv: GameMove) {
        self.undo.push(mv);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn last(&self) -> Option<&GameMove> {
        self.undo.last()
    }

    /// Applied moves, oldest first.
    pub fn moves(&self) -> &[GameMove] {
        &self.undo
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};

    fn flip(rank: Rank) -> GameMove {
        GameMove::deck_flip(Card::new(Suit::Spades, rank))
    }

    #[test]
    fn new_move_clears_redo() {
        let mut history = History::new();
        history.record(flip(Rank::Ace));
        history.record(flip(Rank::Two));

        let undone = history.pop_undo().unwrap();
        history.push_redo(undone);
        assert!(history.can_redo());

        history.record(flip(Rank::Three));
        assert!(!history.can_redo());
        assert_eq!(history.moves().len(), 2);
    }

    #[test]
    fn replay_keeps_remaining_redo() {
        let mut history = History::new();
        history.record(flip(Rank::Ace));
        history.record(flip(Rank::Two));
        for _ in 0..2 {
            let mv = history.pop_undo().unwrap();
            history.push_redo(mv);
        }
        assert!(!history.can_undo());

        let mv = history.pop_redo().unwrap();
        assert_eq!(mv, flip(Rank::Ace));
        history.push_undo(mv);
        assert_eq!(history.redo_len(), 1);
        assert_eq!(history.last(), Some(&flip(Rank::Ace)));
    }
}
