//! Translation of terminal mouse events into board pointer actions.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use strictly_chess::{Point, PromotionPiece};

use super::layout::BoardLayout;

/// A pointer action in board pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Left button pressed.
    Down(Point),
    /// Pointer moved, with or without the button held.
    Move(Point),
    /// Left button released.
    Up(Point),
    /// Pointer left the widget.
    Leave,
}

/// Maps a mouse event to a pointer action.
///
/// Dragging outside the widget is reported as [`PointerAction::Leave`].
pub fn pointer_action(layout: &BoardLayout, event: MouseEvent) -> Option<PointerAction> {
    let inside = layout.contains(event.column, event.row);
    let point = layout.to_pixel(event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => Some(PointerAction::Down(point)),
        MouseEventKind::Drag(MouseButton::Left) if inside => Some(PointerAction::Move(point)),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerAction::Leave),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerAction::Up(point)),
        MouseEventKind::Moved if inside => Some(PointerAction::Move(point)),
        _ => None,
    }
}

/// Clickable rows of the promotion panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionPanel {
    area: Rect,
}

impl PromotionPanel {
    /// Places the panel in the middle of the board.
    pub fn centered_on(board: Rect) -> Self {
        let width = 16.min(board.width);
        let height = (PromotionPiece::ALL.len() as u16 + 2).min(board.height);
        Self {
            area: Rect::new(
                board.x + (board.width - width) / 2,
                board.y + (board.height - height) / 2,
                width,
                height,
            ),
        }
    }

    /// Screen area, border included.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Choice under a click, or `None` if the click missed every row.
    pub fn choice_at(&self, column: u16, row: u16) -> Option<PromotionPiece> {
        let inner_left = self.area.x + 1;
        let inner_right = self.area.x + self.area.width.saturating_sub(1);
        if column < inner_left || column >= inner_right || row <= self.area.y {
            return None;
        }
        PromotionPiece::ALL.get(usize::from(row - self.area.y - 1)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_drag_outside_is_leave() {
        let layout = BoardLayout::fit(Rect::new(0, 0, 40, 20)).unwrap();
        let down = pointer_action(&layout, mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        assert!(matches!(down, Some(PointerAction::Down(_))));
        let out = pointer_action(&layout, mouse(MouseEventKind::Drag(MouseButton::Left), 50, 5));
        assert_eq!(out, Some(PointerAction::Leave));
        let right = pointer_action(&layout, mouse(MouseEventKind::Down(MouseButton::Right), 10, 5));
        assert_eq!(right, None);
    }

    #[test]
    fn test_up_reported_anywhere() {
        let layout = BoardLayout::fit(Rect::new(0, 0, 40, 20)).unwrap();
        let up = pointer_action(&layout, mouse(MouseEventKind::Up(MouseButton::Left), 60, 30));
        assert!(matches!(up, Some(PointerAction::Up(p)) if p.x > layout.container_width()));
    }

    #[test]
    fn test_promotion_panel_rows() {
        let panel = PromotionPanel::centered_on(Rect::new(0, 0, 40, 20));
        let area = panel.area();
        assert_eq!(area, Rect::new(12, 7, 16, 6));
        assert_eq!(panel.choice_at(15, 8), Some(PromotionPiece::Knight));
        assert_eq!(panel.choice_at(15, 11), Some(PromotionPiece::Queen));
        assert_eq!(panel.choice_at(15, 7), None);
        assert_eq!(panel.choice_at(15, 12), None);
        assert_eq!(panel.choice_at(0, 8), None);
    }
}
