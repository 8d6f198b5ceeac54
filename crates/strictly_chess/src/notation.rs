//! Move notation helpers: figurine notation and PGN rendering.

use shakmaty::{Color, Role};
use tracing::instrument;

/// Unicode figurine for a piece of the given colour.
pub fn figurine(role: Role, color: Color) -> char {
    match (color, role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}

/// Converts SAN to figurine algebraic notation for the mover's colour.
///
/// Only the piece letters K, Q, R, B and N are replaced; files, ranks,
/// capture marks and check suffixes pass through. This includes the piece
/// letter of a promotion (`e8=Q` becomes `e8=♕`).
#[instrument]
pub fn san_to_fan(san: &str, mover: Color) -> String {
    san.chars()
        .map(|c| match c {
            'K' => figurine(Role::King, mover),
            'Q' => figurine(Role::Queen, mover),
            'R' => figurine(Role::Rook, mover),
            'B' => figurine(Role::Bishop, mover),
            'N' => figurine(Role::Knight, mover),
            other => other,
        })
        .collect()
}

/// Everything needed to render a game as PGN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Tag pairs in output order.
    pub headers: Vec<(String, String)>,
    /// Full-move number of the first recorded move.
    pub first_move_number: u32,
    /// Whether black made the first recorded move.
    pub black_moves_first: bool,
    /// Moves in SAN, in play order.
    pub moves: Vec<String>,
    /// Result token (`1-0`, `0-1`, `1/2-1/2` or `*`).
    pub result: String,
}

/// Renders a game record as PGN.
///
/// Lines are joined with `newline`. With `max_width`, the movetext wraps at
/// token boundaries so that no line exceeds the width unless a single token
/// is longer than it.
#[instrument(skip(record), fields(moves = record.moves.len()))]
pub fn write_pgn(record: &GameRecord, newline: &str, max_width: Option<usize>) -> String {
    let mut lines: Vec<String> = record
        .headers
        .iter()
        .map(|(key, value)| format!("[{} \"{}\"]", key, escape_tag(value)))
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }

    let tokens = movetext_tokens(record);
    match max_width {
        Some(width) if width > 0 => lines.extend(wrap_tokens(&tokens, width)),
        _ => lines.push(tokens.join(" ")),
    }

    lines.join(newline)
}

fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn movetext_tokens(record: &GameRecord) -> Vec<String> {
    let mut tokens = Vec::with_capacity(record.moves.len() * 3 / 2 + 1);
    let mut number = record.first_move_number.max(1);
    let mut white_to_move = !record.black_moves_first;

    for (index, san) in record.moves.iter().enumerate() {
        if white_to_move {
            tokens.push(format!("{}.", number));
        } else if index == 0 {
            tokens.push(format!("{}...", number));
        }
        tokens.push(san.clone());
        if !white_to_move {
            number += 1;
        }
        white_to_move = !white_to_move;
    }

    tokens.push(record.result.clone());
    tokens
}

fn wrap_tokens(tokens: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for token in tokens {
        if current.is_empty() {
            current.push_str(token);
        } else if current.chars().count() + 1 + token.chars().count() <= width {
            current.push(' ');
            current.push_str(token);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(token);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(moves: &[&str], black_first: bool, first: u32) -> GameRecord {
        GameRecord {
            headers: vec![
                ("White".to_string(), "Alice".to_string()),
                ("Black".to_string(), "Bob".to_string()),
            ],
            first_move_number: first,
            black_moves_first: black_first,
            moves: moves.iter().map(|m| m.to_string()).collect(),
            result: "*".to_string(),
        }
    }

    #[test]
    fn test_fan_replaces_piece_letters_only() {
        assert_eq!(san_to_fan("Nf3", Color::White), "♘f3");
        assert_eq!(san_to_fan("Qxe7#", Color::Black), "♛xe7#");
        assert_eq!(san_to_fan("exd5", Color::White), "exd5");
        assert_eq!(san_to_fan("O-O+", Color::Black), "O-O+");
        assert_eq!(san_to_fan("Rae1", Color::White), "♖ae1");
        // Lowercase b is a file, not a bishop.
        assert_eq!(san_to_fan("bxc3", Color::Black), "bxc3");
    }

    #[test]
    fn test_pgn_from_white() {
        let pgn = write_pgn(&record(&["e4", "e5", "Nf3"], false, 1), "\n", None);
        assert_eq!(
            pgn,
            "[White \"Alice\"]\n[Black \"Bob\"]\n\n1. e4 e5 2. Nf3 *"
        );
    }

    #[test]
    fn test_pgn_black_first() {
        let pgn = write_pgn(&record(&["e5", "Nf3"], true, 7), "\n", None);
        assert!(pgn.ends_with("7... e5 8. Nf3 *"));
    }

    #[test]
    fn test_pgn_custom_newline() {
        let pgn = write_pgn(&record(&["d4"], false, 1), "\r\n", None);
        assert_eq!(pgn, "[White \"Alice\"]\r\n[Black \"Bob\"]\r\n\r\n1. d4 *");
    }

    #[test]
    fn test_pgn_wraps_movetext() {
        let moves = ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6"];
        let pgn = write_pgn(&record(&moves, false, 1), "\n", Some(12));
        let movetext: Vec<&str> = pgn.split('\n').skip(3).collect();
        assert!(movetext.len() > 1);
        for line in &movetext {
            assert!(line.chars().count() <= 12, "line too long: {line}");
        }
        assert_eq!(movetext.join(" "), "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 *");
    }

    #[test]
    fn test_pgn_escapes_tag_values() {
        let mut rec = record(&[], false, 1);
        rec.headers = vec![("White".to_string(), "A \"quoted\" name".to_string())];
        let pgn = write_pgn(&rec, "\n", None);
        assert!(pgn.starts_with("[White \"A \\\"quoted\\\" name\"]"));
        assert!(pgn.ends_with("\n\n*"));
    }
}
