//! Simple engine for testing (no search).

use std::time::Duration;

use anyhow::{Context, Result};
use shakmaty::{CastlingMode, Chess, Position, fen::Fen, san::San};
use tracing::debug;

use super::Player;

/// Engine that plays the first capture it finds, otherwise the first legal
/// move.
pub struct SimpleEngine {
    name: String,
    delay: Duration,
}

impl SimpleEngine {
    /// Creates a new engine that "thinks" for `delay` before answering.
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

#[async_trait::async_trait]
impl Player for SimpleEngine {
    async fn get_move(&mut self, fen: &str) -> Result<String> {
        debug!(engine = %self.name, %fen, "Engine making move");

        tokio::time::sleep(self.delay).await;

        let position: Chess = fen
            .parse::<Fen>()
            .context("Engine received a malformed FEN")?
            .into_position(CastlingMode::Standard)
            .context("Engine received an illegal position")?;

        let moves = position.legal_moves();
        let chosen = moves
            .iter()
            .find(|m| m.is_capture())
            .or_else(|| moves.first())
            .cloned()
            .context("No legal moves available")?;

        let san = San::from_move(&position, &chosen).to_string();
        debug!(engine = %self.name, %san, "Engine chose move");
        Ok(san)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prefers_capture() {
        let mut engine = SimpleEngine::new("Engine", Duration::ZERO);
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
        assert_eq!(engine.get_move(fen).await.unwrap(), "exd5");
    }

    #[tokio::test]
    async fn test_fails_without_moves() {
        let mut engine = SimpleEngine::new("Engine", Duration::ZERO);
        // White is checkmated.
        let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        assert!(engine.get_move(fen).await.is_err());
        assert!(engine.get_move("garbage").await.is_err());
    }
}
