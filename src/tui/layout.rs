//! Mapping between terminal cells and the board's pixel space.
//!
//! A board cell is drawn `2n` columns wide and `n` rows tall, which looks
//! roughly square in a terminal. One pixel is one column wide and half a row
//! tall, so the board's pixel space stays square and the controller's
//! coordinate mapping works unchanged.

use ratatui::layout::Rect;
use strictly_chess::Point;
use tracing::instrument;

/// Logical grid size of the widget (board plus label margin).
const GRID: u16 = 10;

/// Pixels per terminal row.
const PIXELS_PER_ROW: f64 = 2.0;

/// Placement of the board widget on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    area: Rect,
    cell_rows: u16,
}

impl BoardLayout {
    /// Fits the largest board into `available`, centered.
    ///
    /// Returns `None` if not even the smallest board fits.
    #[instrument]
    pub fn fit(available: Rect) -> Option<Self> {
        let cell_rows = (available.height / GRID).min(available.width / (2 * GRID));
        if cell_rows == 0 {
            return None;
        }
        let width = cell_rows * 2 * GRID;
        let height = cell_rows * GRID;
        let area = Rect::new(
            available.x + (available.width - width) / 2,
            available.y + (available.height - height) / 2,
            width,
            height,
        );
        Some(Self { area, cell_rows })
    }

    /// Screen area of the widget, margins included.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Terminal rows per board cell.
    pub fn cell_rows(&self) -> u16 {
        self.cell_rows
    }

    /// Terminal columns per board cell.
    pub fn cell_cols(&self) -> u16 {
        self.cell_rows * 2
    }

    /// Width of the widget in controller pixels.
    pub fn container_width(&self) -> f64 {
        f64::from(self.area.width)
    }

    /// Whether a terminal cell lies inside the widget.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// Pixel at the center of a terminal cell.
    ///
    /// Cells outside the widget map to pixels outside `0..container_width`.
    pub fn to_pixel(&self, column: u16, row: u16) -> Point {
        let x = f64::from(column) - f64::from(self.area.x) + 0.5;
        let y = (f64::from(row) - f64::from(self.area.y) + 0.5) * PIXELS_PER_ROW;
        Point::new(x, y)
    }

    /// Terminal cell containing a pixel, if it is inside the widget.
    pub fn to_terminal(&self, point: Point) -> Option<(u16, u16)> {
        if !point.x.is_finite() || !point.y.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let dx = point.x.floor();
        let dy = (point.y / PIXELS_PER_ROW).floor();
        if dx >= f64::from(self.area.width) || dy >= f64::from(self.area.height) {
            return None;
        }
        Some((self.area.x + dx as u16, self.area.y + dy as u16))
    }

    /// Screen rectangle of a board cell given its pixel origin.
    pub fn cell_rect(&self, origin: Point) -> Option<Rect> {
        let (column, row) = self.to_terminal(origin)?;
        Some(Rect::new(column, row, self.cell_cols(), self.cell_rows).intersection(self.area))
    }
}
