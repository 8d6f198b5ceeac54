//! Outward notifications emitted by the board.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use crate::notation::san_to_fan;
use crate::oracle::AppliedMove;

/// Payload of a committed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct MoveDone {
    /// Full-move number the move belongs to.
    move_number: u32,
    /// Whether white made the move.
    white_turn: bool,
    /// Standard algebraic notation.
    move_san: String,
    /// Figurine algebraic notation.
    move_fan: String,
    /// Origin file index (0 = a).
    from_file_index: u8,
    /// Origin rank index (0 = first rank).
    from_rank_index: u8,
    /// Target file index.
    to_file_index: u8,
    /// Target rank index.
    to_rank_index: u8,
}

impl From<&AppliedMove> for MoveDone {
    fn from(applied: &AppliedMove) -> Self {
        Self {
            move_number: applied.move_number,
            white_turn: applied.mover == shakmaty::Color::White,
            move_san: applied.san.clone(),
            move_fan: san_to_fan(&applied.san, applied.mover),
            from_file_index: applied.from.file(),
            from_rank_index: applied.from.rank(),
            to_file_index: applied.to.file(),
            to_rank_index: applied.to.rank(),
        }
    }
}

/// Notifications emitted by the board controller.
///
/// Termination events fire at most once per game; `MoveDone` fires once per
/// committed move and `WaitingManualMove` once per turn boundary where the
/// side to move is externally driven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    /// The side to move is checkmated.
    #[serde(rename_all = "camelCase")]
    Checkmate {
        /// True if white is the mated side.
        white_was_checkmated: bool,
    },
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// The same position occurred three times.
    ThreeFoldRepetition,
    /// Neither side can deliver mate.
    InsufficientMaterial,
    /// Fifty moves passed without a capture or pawn move.
    FiftyMovesRule,
    /// A move was committed.
    MoveDone(MoveDone),
    /// The side to move must be supplied through the external move API.
    WaitingManualMove,
}

impl BoardEvent {
    /// Whether this event ends the game.
    pub fn is_termination(&self) -> bool {
        matches!(
            self,
            BoardEvent::Checkmate { .. }
                | BoardEvent::Stalemate
                | BoardEvent::ThreeFoldRepetition
                | BoardEvent::InsufficientMaterial
                | BoardEvent::FiftyMovesRule
        )
    }
}
