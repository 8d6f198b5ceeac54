//! Coordinate mapping between pixels, visual cells and algebraic squares.
//!
//! The widget is a 10×10 grid: the 8×8 board plus a one-cell margin on
//! every side for the coordinate labels. Visual cells count from the top-left
//! corner of the board (row 0 = top); algebraic squares count from a1.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of grid cells across the whole widget, margins included.
pub const GRID_CELLS: f64 = 10.0;

/// Fraction of the container width taken by one cell.
pub const CELL_RATIO: f64 = 1.0 / GRID_CELLS;

/// An algebraic square: file 0 = "a", rank 0 = "1".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSquare {
    file: u8,
    rank: u8,
}

impl BoardSquare {
    /// Creates a square, or `None` if either index is outside 0..=7.
    #[instrument]
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    /// Builds a square from indices already known to be on the board.
    pub(crate) const fn masked(file: u8, rank: u8) -> Self {
        Self {
            file: file & 7,
            rank: rank & 7,
        }
    }

    /// Parses a square name such as `"e4"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank)
        {
            return None;
        }
        Self::new(file as u8 - b'a', rank as u8 - b'1')
    }

    /// File index (0 = a).
    pub fn file(&self) -> u8 {
        self.file
    }

    /// Rank index (0 = first rank).
    pub fn rank(&self) -> u8 {
        self.rank
    }
}

impl std::fmt::Display for BoardSquare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

/// A visual cell of the 8×8 board, independent of orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column, 0 = leftmost.
    pub col: u8,
    /// Row, 0 = top.
    pub row: u8,
}

/// A point in widget pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the widget's left edge.
    pub x: f64,
    /// Vertical offset from the widget's top edge.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Side length of one grid cell for the given container width.
pub fn cell_size(container_width: f64) -> f64 {
    container_width * CELL_RATIO
}

/// Maps a pixel position to the board cell under it.
///
/// Returns `None` for positions in the label margin or outside the widget,
/// and for a degenerate container.
#[instrument]
pub fn pixel_to_cell(x: f64, y: f64, container_width: f64) -> Option<Cell> {
    let size = cell_size(container_width);
    if size.is_nan() || size <= 0.0 || !x.is_finite() || !y.is_finite() {
        return None;
    }
    let col = (x / size).floor() - 1.0;
    let row = (y / size).floor() - 1.0;
    if (0.0..8.0).contains(&col) && (0.0..8.0).contains(&row) {
        Some(Cell {
            col: col as u8,
            row: row as u8,
        })
    } else {
        None
    }
}

/// Converts a visual cell to the algebraic square shown there.
pub fn cell_to_square(cell: Cell, reversed: bool) -> BoardSquare {
    let file = if reversed { 7 - cell.col } else { cell.col };
    let rank = if reversed { cell.row } else { 7 - cell.row };
    BoardSquare { file, rank }
}

/// Converts an algebraic square to the visual cell that displays it.
pub fn square_to_cell(square: BoardSquare, reversed: bool) -> Cell {
    let col = if reversed { 7 - square.file } else { square.file };
    let row = if reversed { square.rank } else { 7 - square.rank };
    Cell { col, row }
}

/// Top-left pixel of a visual cell.
pub fn cell_origin(cell: Cell, cell_size: f64) -> Point {
    Point::new(
        (f64::from(cell.col) + 1.0) * cell_size,
        (f64::from(cell.row) + 1.0) * cell_size,
    )
}

/// Pixel center of a visual cell.
pub fn cell_center(cell: Cell, cell_size: f64) -> Point {
    let origin = cell_origin(cell, cell_size);
    Point::new(origin.x + cell_size / 2.0, origin.y + cell_size / 2.0)
}

/// Overlay anchor that places a piece exactly on `square`.
pub fn square_overlay_origin(square: BoardSquare, reversed: bool, cell_size: f64) -> Point {
    cell_origin(square_to_cell(square, reversed), cell_size)
}

/// Overlay anchor that centers a dragged piece under the pointer.
pub fn pointer_overlay_origin(pointer: Point, cell_size: f64) -> Point {
    Point::new(pointer.x - cell_size / 2.0, pointer.y - cell_size / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_cell_inside_board() {
        // 400px widget: 40px cells, board starts at 40px.
        assert_eq!(pixel_to_cell(45.0, 45.0, 400.0), Some(Cell { col: 0, row: 0 }));
        assert_eq!(pixel_to_cell(359.0, 359.0, 400.0), Some(Cell { col: 7, row: 7 }));
        assert_eq!(pixel_to_cell(205.0, 85.0, 400.0), Some(Cell { col: 4, row: 1 }));
    }

    #[test]
    fn test_pixel_to_cell_outside_board() {
        assert_eq!(pixel_to_cell(10.0, 100.0, 400.0), None);
        assert_eq!(pixel_to_cell(100.0, 365.0, 400.0), None);
        assert_eq!(pixel_to_cell(-5.0, 100.0, 400.0), None);
        assert_eq!(pixel_to_cell(100.0, 100.0, 0.0), None);
        assert_eq!(pixel_to_cell(f64::NAN, 100.0, 400.0), None);
    }

    #[test]
    fn test_cell_to_square_orientation() {
        let top_left = Cell { col: 0, row: 0 };
        assert_eq!(cell_to_square(top_left, false), BoardSquare::new(0, 7).unwrap());
        assert_eq!(cell_to_square(top_left, true), BoardSquare::new(7, 0).unwrap());
    }

    #[test]
    fn test_square_cell_inverse() {
        for file in 0..8 {
            for rank in 0..8 {
                let square = BoardSquare::new(file, rank).unwrap();
                for reversed in [false, true] {
                    let cell = square_to_cell(square, reversed);
                    assert_eq!(cell_to_square(cell, reversed), square);
                }
            }
        }
    }

    #[test]
    fn test_square_names() {
        let e4 = BoardSquare::from_name("e4").unwrap();
        assert_eq!((e4.file(), e4.rank()), (4, 3));
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(BoardSquare::from_name("i1"), None);
        assert_eq!(BoardSquare::from_name("e9"), None);
        assert_eq!(BoardSquare::from_name("e44"), None);
        assert_eq!(BoardSquare::new(8, 0), None);
    }

    #[test]
    fn test_overlay_origins() {
        let e2 = BoardSquare::from_name("e2").unwrap();
        // Not reversed: e2 is column 4, row 6.
        assert_eq!(square_overlay_origin(e2, false, 40.0), Point::new(200.0, 280.0));
        // Reversed: column 3, row 1.
        assert_eq!(square_overlay_origin(e2, true, 40.0), Point::new(160.0, 80.0));
        assert_eq!(
            pointer_overlay_origin(Point::new(100.0, 100.0), 40.0),
            Point::new(80.0, 80.0)
        );
    }
}
