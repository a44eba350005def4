//! Game-over statistics and a running tally across games.

use serde::{Deserialize, Serialize};

/// Payload of the game-over signal handed to the statistics collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverStats {
    pub moves: u32,
    pub n_hints: u32,
    pub seconds: u64,
}

/// Win/loss tally, used by the demo driver when it plays several deals.
#[derive(Default, Debug)]
pub struct Stats {
    pub games_played: u64,
    pub games_won: u64,
    pub games_lost: u64,
    pub moves_in_wins: u64,
}

impl Stats {
    pub fn record_win(&mut self, game: &GameOverStats) {
        self.games_played += 1;
        self.games_won += 1;
        self.moves_in_wins += u64::from(game.moves);
    }

    pub fn record_loss(&mut self) {
        self.games_played += 1;
        self.games_lost += 1;
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64
        }
    }

    /// Mean move count over won games.
    pub fn average_winning_moves(&self) -> Option<f64> {
        (self.games_won > 0).then(|| self.moves_in_wins as f64 / self.games_won as f64)
    }
}
