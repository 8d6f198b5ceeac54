//! Stateless UI rendering for the chessboard.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use shakmaty::Piece;
use strictly_chess::{
    BoardController, Cell, Gesture, Point,
    coords::{cell_origin, cell_to_square},
    notation::figurine,
};
use unicode_width::UnicodeWidthChar;

use super::app::App;
use super::input::PromotionPanel;
use super::layout::BoardLayout;

const LIGHT_SQUARE: Color = Color::Rgb(238, 238, 210);
const DARK_SQUARE: Color = Color::Rgb(118, 150, 86);
const LAST_MOVE_TINT: Color = Color::Rgb(186, 202, 68);
const HOVER_TINT: Color = Color::Rgb(246, 246, 105);
const ARROW_COLOR: Color = Color::Rgb(220, 80, 40);

/// Splits the screen into title, board, status and help.
fn screen_chunks(area: Rect) -> (Rect, Rect, Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(44)])
        .split(rows[1]);
    (rows[0], main[0], main[1], rows[2], rows[3])
}

/// Area available to the board for a given screen size.
pub fn board_region(area: Rect) -> Rect {
    screen_chunks(area).1
}

/// Draws the main UI.
pub fn draw(f: &mut Frame, app: &App, board: &BoardController) {
    let (title_area, board_area, side_area, status_area, help_area) = screen_chunks(f.area());

    let title = Paragraph::new("Strictly Chessboard")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, title_area);

    match app.layout() {
        Some(layout) => {
            f.render_widget(BoardView { board, layout }, board_area);
            if let Some(request) = board.gesture().promotion() {
                render_promotion_panel(f, layout, request.piece);
            }
        }
        None => {
            let message = Paragraph::new("Terminal too small for the board")
                .alignment(Alignment::Center);
            f.render_widget(message, board_area);
        }
    }

    render_side_panel(f, side_area, app);

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, status_area);

    let help = Paragraph::new(
        "Drag to move | R: Reverse | N: New game | P: PGN | C: Coordinates | A: Arrow | Q: Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, help_area);
}

fn render_side_panel(f: &mut Frame, area: Rect, app: &App) {
    let (title, text) = match app.pgn() {
        Some(pgn) => ("PGN", pgn.to_string()),
        None => ("Moves", move_list(app)),
    };
    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(panel, area);
}

fn move_list(app: &App) -> String {
    let mut lines: Vec<String> = Vec::new();
    for done in app.moves() {
        if *done.white_turn() {
            lines.push(format!("{:>3}. {}", done.move_number(), done.move_fan()));
        } else {
            match lines.last_mut() {
                Some(line) if line.starts_with(&format!("{:>3}. ", done.move_number())) => {
                    line.push_str(&format!("  {}", done.move_fan()));
                }
                _ => lines.push(format!("{:>3}. ...  {}", done.move_number(), done.move_fan())),
            }
        }
    }
    lines.join("\n")
}

fn render_promotion_panel(f: &mut Frame, layout: BoardLayout, pawn: Piece) {
    let panel = PromotionPanel::centered_on(layout.area());
    let lines: Vec<Line> = strictly_chess::PromotionPiece::ALL
        .iter()
        .map(|choice| Line::from(format!(" {} {}", figurine(choice.role(), pawn.color), choice)))
        .collect();
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Promote")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );
    f.render_widget(Clear, panel.area());
    f.render_widget(widget, panel.area());
}

/// The board itself: squares, pieces, labels, arrow and dragged piece.
struct BoardView<'a> {
    board: &'a BoardController,
    layout: BoardLayout,
}

impl Widget for BoardView<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let settings = self.board.settings();
        let size = self.board.cell_size();
        let gesture = self.board.gesture();
        let last_move = self.board.last_move();

        let (hidden, hovered) = match gesture {
            Gesture::Dragging(session) => (Some(session.origin), session.hovered),
            Gesture::PendingPromotion(request) => (Some(request.origin), None),
            Gesture::Idle => (None, None),
        };

        for row in 0..8u8 {
            for col in 0..8u8 {
                let cell = Cell { col, row };
                let square = cell_to_square(cell, settings.reversed);
                let Some(rect) = self.layout.cell_rect(cell_origin(cell, size)) else {
                    continue;
                };

                let touched =
                    last_move.is_some_and(|m| m.from == square || m.to == square);
                let background = if hovered == Some(square) {
                    HOVER_TINT
                } else if touched {
                    LAST_MOVE_TINT
                } else if (square.file() + square.rank()) % 2 == 1 {
                    LIGHT_SQUARE
                } else {
                    DARK_SQUARE
                };
                buf.set_style(rect, Style::default().bg(background));

                if hidden == Some(square) {
                    continue;
                }
                if let Some(piece) = self.board.piece_at(square) {
                    put_piece(buf, rect, piece);
                }
            }
        }

        if settings.coordinates_visible {
            self.render_labels(buf, size);
        }
        if let Some(arrow) = self.board.arrow() {
            for stroke in arrow.strokes() {
                let (start, end) = stroke.center_line();
                self.rasterize(buf, start, end);
            }
        }

        let floating = match gesture {
            Gesture::Dragging(session) => {
                Some((session.overlay_origin(size), session.piece))
            }
            Gesture::PendingPromotion(request) => Some((request.overlay, request.piece)),
            Gesture::Idle => None,
        };
        if let Some((origin, piece)) = floating {
            if let Some(rect) = self.layout.cell_rect(origin) {
                put_piece(buf, rect, piece);
            }
        }
    }
}

impl BoardView<'_> {
    fn render_labels(&self, buf: &mut Buffer, size: f64) {
        let reversed = self.board.settings().reversed;
        let style = Style::default().fg(Color::Gray);
        for index in 0..8u8 {
            // Files along the bottom margin, ranks along the left margin.
            let file_cell = Cell { col: index, row: 8 };
            let file = cell_to_square(Cell { col: index, row: 0 }, reversed).file();
            if let Some(rect) = self.layout.cell_rect(cell_origin(file_cell, size)) {
                put_char(buf, rect, (b'a' + file) as char, style);
            }

            let rank_origin = Point::new(0.0, cell_origin(Cell { col: 0, row: index }, size).y);
            let rank = cell_to_square(Cell { col: 0, row: index }, reversed).rank();
            if let Some(rect) = self.layout.cell_rect(rank_origin) {
                put_char(buf, rect, (b'1' + rank) as char, style);
            }
        }
    }

    fn rasterize(&self, buf: &mut Buffer, start: Point, end: Point) {
        let length = (end.x - start.x).hypot(end.y - start.y);
        let steps = (length * 2.0).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let point = Point::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            );
            if let Some((x, y)) = self.layout.to_terminal(point) {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol("•").set_fg(ARROW_COLOR);
                }
            }
        }
    }
}

fn put_piece(buf: &mut Buffer, rect: Rect, piece: Piece) {
    // Filled glyphs for both sides; colour tells them apart.
    let glyph = figurine(piece.role, shakmaty::Color::Black);
    let fg = match piece.color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    };
    put_char(buf, rect, glyph, Style::default().fg(fg).add_modifier(Modifier::BOLD));
}

fn put_char(buf: &mut Buffer, rect: Rect, glyph: char, style: Style) {
    let width = glyph.width().unwrap_or(1) as u16;
    let x = rect.x + rect.width.saturating_sub(width) / 2;
    let y = rect.y + rect.height / 2;
    buf.set_string(x, y, glyph.to_string(), style);
}
