//! Strictly Chessboard - an interactive chessboard for the terminal
//!
//! Drag pieces with the mouse, promote through a pop-up panel and follow the
//! last move by its arrow. Sides can be handed to a built-in engine, which
//! plays through the same external move API any other driver would use.
//!
//! # Architecture
//!
//! - **Controller** ([`strictly_chess`]): gestures, promotion, arrow
//!   geometry, turn ownership and game termination
//! - **TUI**: ratatui renderer, mouse translation and the engine orchestrator
//! - **Config**: TOML configuration with command-line overrides
//! - **Replay**: non-interactive SAN replay to PGN
//!
//! # Example
//!
//! ```no_run
//! use strictly_chessboard::{AppConfig, PlayerKind};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load_or_default("strictly_chessboard.toml")?
//!     .with_overrides(None, false, None, Some(PlayerKind::Engine));
//! strictly_chessboard::tui::run_tui(config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod app_config;
mod cli;
mod replay;

/// Terminal user interface.
pub mod tui;

// Crate-level exports - Configuration
pub use app_config::{AppConfig, ConfigError, PlayerKind};

// Crate-level exports - Command line
pub use cli::{Cli, Command};

// Crate-level exports - Replay
pub use replay::replay_to_pgn;

// Crate-level exports - Board controller
pub use strictly_chess::{
    ArrowGeometry, BoardController, BoardError, BoardErrorKind, BoardEvent, BoardResult,
    BoardSession, BoardSettings, BoardSquare, Gesture, LastMove, MoveDone, MoveRequest, Point,
    PositionUpdate, PromotionPiece,
};
