//! Interactive chessboard controller.
//!
//! This crate turns pointer gestures and externally supplied moves into
//! committed chess moves, last-move arrow geometry and game notifications.
//! Rendering is left to the host: it feeds pixel coordinates in and reads
//! the gesture state, pieces and arrow strokes back out.
//!
//! # Architecture
//!
//! - [`coords`]: pixel ↔ cell ↔ square mapping under board reversal
//! - [`oracle`]: the rules engine adapter (probe on a copy, commit on the
//!   live position)
//! - [`drag`]: the gesture state (idle, dragging, pending promotion)
//! - [`arbiter`]: which side moves with the pointer
//! - [`arrow`]: last-move arrow rectangles
//! - [`controller`]: the state machine tying these together
//! - [`session`]: async shared handle with deferred termination checks
//!
//! # Example
//!
//! ```
//! use strictly_chess::{BoardController, BoardEvent, BoardSettings};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let settings = BoardSettings::default().with_black_player_human(false);
//! let mut board = BoardController::new(settings, 400.0, tx);
//! board.start_new_game("").unwrap();
//!
//! // Drag e2 to e4: cells are 40px, the board starts 40px in.
//! assert!(board.pointer_down(220.0, 300.0));
//! assert!(board.pointer_up(220.0, 220.0));
//! board.settle();
//!
//! assert!(matches!(rx.try_recv(), Ok(BoardEvent::MoveDone(_))));
//! assert_eq!(rx.try_recv(), Ok(BoardEvent::WaitingManualMove));
//! assert!(board.play_move_san("e5"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod arbiter;
pub mod arrow;
pub mod controller;
pub mod coords;
pub mod drag;
pub mod error;
pub mod events;
pub mod notation;
pub mod oracle;
pub mod promotion;
pub mod session;
pub mod settings;

pub use arbiter::{Authority, PlayerRoster};
pub use arrow::{ArrowGeometry, LastMove, Stroke, compute_arrow};
pub use controller::{BoardController, MoveRequest, PositionUpdate};
pub use coords::{BoardSquare, Cell, Point};
pub use drag::{DragSession, Gesture, PromotionRequest};
pub use error::{BoardError, BoardErrorKind, BoardResult};
pub use events::{BoardEvent, MoveDone};
pub use notation::{GameRecord, san_to_fan, write_pgn};
pub use oracle::{AppliedMove, RulesOracle};
pub use promotion::PromotionPiece;
pub use session::{BoardSession, DEFAULT_TERMINATION_DELAY};
pub use settings::BoardSettings;
