//! Turn ownership between the pointer and external callers.

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use tracing::instrument;

/// Who submits moves for a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    /// Moves come from pointer gestures on the board.
    Pointer,
    /// Moves come from `play_move` / `play_move_san`.
    Manual,
}

/// Per-colour humanness lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoster {
    /// White moves with the pointer.
    pub white_human: bool,
    /// Black moves with the pointer.
    pub black_human: bool,
}

impl Default for PlayerRoster {
    fn default() -> Self {
        Self {
            white_human: true,
            black_human: true,
        }
    }
}

impl PlayerRoster {
    /// Creates a roster.
    pub fn new(white_human: bool, black_human: bool) -> Self {
        Self {
            white_human,
            black_human,
        }
    }

    /// Whether the pointer owns the move for `side_to_move`.
    #[instrument]
    pub fn human_turn_now(&self, side_to_move: Color) -> bool {
        match side_to_move {
            Color::White => self.white_human,
            Color::Black => self.black_human,
        }
    }

    /// Authority for `side`.
    pub fn authority(&self, side: Color) -> Authority {
        if self.human_turn_now(side) {
            Authority::Pointer
        } else {
            Authority::Manual
        }
    }
}
