//! Promotion choices offered when a pawn reaches the last rank.

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Piece, Role};
use strum::Display;
use tracing::instrument;

use crate::coords::BoardSquare;

/// A piece a pawn may promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PromotionPiece {
    /// Knight (`n`).
    Knight,
    /// Bishop (`b`).
    Bishop,
    /// Rook (`r`).
    Rook,
    /// Queen (`q`).
    Queen,
}

impl PromotionPiece {
    /// Choices in the order the promotion panel presents them.
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Knight,
        PromotionPiece::Bishop,
        PromotionPiece::Rook,
        PromotionPiece::Queen,
    ];

    /// Parses a promotion letter; `n`, `b`, `r` and `q` in either case.
    #[instrument]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'r' => Some(Self::Rook),
            'q' => Some(Self::Queen),
            _ => None,
        }
    }

    /// Parses a one-letter promotion string such as `"q"`.
    pub fn from_str_letter(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::from_letter(letter),
            _ => None,
        }
    }

    /// Lowercase promotion letter.
    pub fn letter(self) -> char {
        match self {
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
        }
    }

    /// Rules-engine role for this choice.
    pub fn role(self) -> Role {
        match self {
            Self::Knight => Role::Knight,
            Self::Bishop => Role::Bishop,
            Self::Rook => Role::Rook,
            Self::Queen => Role::Queen,
        }
    }

    /// Converts a rules-engine role back into a choice.
    pub fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::Knight => Some(Self::Knight),
            Role::Bishop => Some(Self::Bishop),
            Role::Rook => Some(Self::Rook),
            Role::Queen => Some(Self::Queen),
            Role::Pawn | Role::King => None,
        }
    }
}

/// Whether moving `piece` from `origin` to `target` is a promotion.
///
/// Only the piece and the ranks are consulted; legality is decided elsewhere.
pub fn requires_promotion(piece: Piece, origin: BoardSquare, target: BoardSquare) -> bool {
    if piece.role != Role::Pawn {
        return false;
    }
    match piece.color {
        Color::White => origin.rank() == 6 && target.rank() == 7,
        Color::Black => origin.rank() == 1 && target.rank() == 0,
    }
}
