//! Externally driven players.

mod simple_engine;

pub use simple_engine::SimpleEngine;

use anyhow::Result;

/// A player that supplies moves through the board's external move API.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Chooses a move for the side to move in `fen`.
    ///
    /// Returns the move in SAN.
    async fn get_move(&mut self, fen: &str) -> Result<String>;

    /// Returns the player's display name.
    fn name(&self) -> &str;
}
