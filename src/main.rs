//! Strictly Chessboard - Unified CLI
//!
//! Interactive board and non-interactive PGN replay.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use strictly_chessboard::{AppConfig, Cli, Command, replay_to_pgn, tui::run_tui};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            fen,
            reversed,
            white,
            black,
        } => {
            let config = AppConfig::load_or_default(&config)?
                .with_overrides(fen, reversed, white, black);
            run_tui(config).await
        }
        Command::Pgn {
            fen,
            white,
            black,
            max_width,
            moves,
        } => run_pgn(fen, white, black, max_width, moves).await,
    }
}

/// Replay moves and print the PGN
#[instrument(skip(moves))]
async fn run_pgn(
    fen: Option<String>,
    white: String,
    black: String,
    max_width: Option<usize>,
    moves: Vec<String>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(moves = moves.len(), "Replaying game");
    let pgn = replay_to_pgn(fen.as_deref().unwrap_or(""), &moves, &white, &black, max_width).await?;
    println!("{}", pgn);
    Ok(())
}
