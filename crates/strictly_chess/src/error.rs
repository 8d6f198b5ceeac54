//! Board controller error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Specific failure conditions of the board controller.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BoardErrorKind {
    /// The position string could not be parsed or describes an illegal setup.
    #[display("Invalid position '{}'", _0)]
    InvalidFen(String),

    /// The requested move is not legal in the current position.
    #[display("Illegal move {}", _0)]
    IllegalMove(String),

    /// The SAN string could not be parsed or resolved.
    #[display("Invalid SAN '{}'", _0)]
    InvalidSan(String),

    /// The game is not running.
    #[display("Game is not in progress")]
    GameNotRunning,

    /// The side to move is controlled by the pointer, not by external calls.
    #[display("It is the human player's turn")]
    NotManualTurn,

    /// A promotion choice is still pending.
    #[display("A promotion choice is pending")]
    PromotionPending,

    /// A move was supplied with square indices outside 0..=7.
    #[display("Square index out of range: file {}, rank {}", _0, _1)]
    SquareOutOfRange(u8, u8),
}

/// Board error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", kind, file, line)]
pub struct BoardError {
    /// What went wrong.
    pub kind: BoardErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: BoardErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &BoardErrorKind {
        &self.kind
    }
}

impl From<BoardErrorKind> for BoardError {
    #[track_caller]
    fn from(kind: BoardErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result alias for board controller operations.
pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_records_location() {
        let err = BoardError::new(BoardErrorKind::GameNotRunning);
        assert!(err.file.ends_with("error.rs"));
        assert!(err.line > 0);
        assert_eq!(err.kind(), &BoardErrorKind::GameNotRunning);
    }

    #[test]
    fn test_error_display_includes_kind() {
        let err: BoardError = BoardErrorKind::InvalidFen("xyz".to_string()).into();
        let text = err.to_string();
        assert!(text.starts_with("Board error: Invalid position 'xyz'"));
    }
}
