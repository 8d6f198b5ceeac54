//! Command-line interface for strictly_chessboard.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app_config::PlayerKind;

/// Strictly Chessboard - drag-and-drop chess in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_chessboard")]
#[command(about = "Interactive terminal chessboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play on the interactive board
    Play {
        /// Path to the configuration file (defaults are used if missing)
        #[arg(short, long, default_value = "strictly_chessboard.toml")]
        config: PathBuf,

        /// Starting position in FEN
        #[arg(long)]
        fen: Option<String>,

        /// Draw black at the bottom
        #[arg(long)]
        reversed: bool,

        /// Who moves white
        #[arg(long, value_enum)]
        white: Option<PlayerKind>,

        /// Who moves black
        #[arg(long, value_enum)]
        black: Option<PlayerKind>,
    },

    /// Replay SAN moves and print the game as PGN
    Pgn {
        /// Starting position in FEN
        #[arg(long)]
        fen: Option<String>,

        /// White player's name
        #[arg(long, default_value = "White")]
        white: String,

        /// Black player's name
        #[arg(long, default_value = "Black")]
        black: String,

        /// Wrap movetext at this many characters
        #[arg(long)]
        max_width: Option<usize>,

        /// Moves in SAN, in play order
        moves: Vec<String>,
    },
}
