//! Transient pointer states: an active drag or a pending promotion.
//!
//! Both live in one enum so that at most one of them can exist at a time.

use shakmaty::Piece;
use tracing::{debug, instrument};

use crate::coords::{BoardSquare, Point, pointer_overlay_origin, square_overlay_origin};

/// A piece being dragged by the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Square the piece was picked up from.
    pub origin: BoardSquare,
    /// The dragged piece.
    pub piece: Piece,
    /// Last pointer position, in widget pixels.
    pub pointer: Point,
    /// Square currently under the pointer, if it is over the board.
    pub hovered: Option<BoardSquare>,
}

impl DragSession {
    /// Where the dragged piece is drawn: centered under the pointer.
    pub fn overlay_origin(&self, cell_size: f64) -> Point {
        pointer_overlay_origin(self.pointer, cell_size)
    }
}

/// A pawn move to the last rank waiting for a piece choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromotionRequest {
    /// Square the pawn left.
    pub origin: BoardSquare,
    /// Square the pawn reaches.
    pub target: BoardSquare,
    /// The promoting pawn.
    pub piece: Piece,
    /// Frozen overlay anchor of the pawn, on the target cell.
    pub overlay: Point,
}

impl PromotionRequest {
    /// Re-pins the frozen pawn to the target cell after a layout change.
    #[instrument(skip(self))]
    pub fn pin(&mut self, reversed: bool, cell_size: f64) {
        self.overlay = square_overlay_origin(self.target, reversed, cell_size);
    }
}

/// Gesture state of the board.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No pointer interaction in progress.
    #[default]
    Idle,
    /// A piece is being dragged.
    Dragging(DragSession),
    /// A promotion choice blocks all other input.
    PendingPromotion(PromotionRequest),
}

impl Gesture {
    /// Whether the board is idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Active drag session, if any.
    pub fn drag(&self) -> Option<&DragSession> {
        match self {
            Gesture::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Pending promotion request, if any.
    pub fn promotion(&self) -> Option<&PromotionRequest> {
        match self {
            Gesture::PendingPromotion(request) => Some(request),
            _ => None,
        }
    }

    /// Updates the pointer and hovered square of an active drag.
    ///
    /// Does nothing in any other state.
    pub fn track(&mut self, pointer: Point, hovered: Option<BoardSquare>) {
        if let Gesture::Dragging(session) = self {
            session.pointer = pointer;
            session.hovered = hovered;
        }
    }

    /// Abandons an active drag. Idle and pending promotion are left as-is.
    pub fn cancel_drag(&mut self) -> bool {
        if let Gesture::Dragging(session) = self {
            debug!(origin = %session.origin, "Drag cancelled");
            *self = Gesture::Idle;
            true
        } else {
            false
        }
    }

    /// Takes the active drag session, leaving the board idle.
    pub fn take_drag(&mut self) -> Option<DragSession> {
        match std::mem::take(self) {
            Gesture::Dragging(session) => Some(session),
            other => {
                *self = other;
                None
            }
        }
    }
}
