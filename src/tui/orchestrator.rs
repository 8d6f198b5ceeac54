//! Drives externally controlled sides and forwards board events to the UI.

use anyhow::Result;
use strictly_chess::{Authority, BoardEvent, BoardSession};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::players::Player;

/// Events consumed by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Notification from the board.
    Board(BoardEvent),
    /// An engine started thinking.
    EngineThinking {
        /// Engine name.
        player: String,
    },
    /// An engine failed to produce a move.
    EngineError {
        /// Engine name.
        player: String,
        /// What went wrong.
        message: String,
    },
}

/// Answers `WaitingManualMove` notifications with moves from the players.
pub struct Orchestrator {
    session: BoardSession,
    white: Box<dyn Player>,
    black: Box<dyn Player>,
    board_rx: mpsc::UnboundedReceiver<BoardEvent>,
    event_tx: mpsc::UnboundedSender<GameEvent>,
}

impl Orchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        session: BoardSession,
        white: Box<dyn Player>,
        black: Box<dyn Player>,
        board_rx: mpsc::UnboundedReceiver<BoardEvent>,
        event_tx: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self {
            session,
            white,
            black,
            board_rx,
            event_tx,
        }
    }

    /// Runs until the board or the UI goes away.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<()> {
        info!("Starting game orchestration");

        while let Some(event) = self.board_rx.recv().await {
            let waiting = event == BoardEvent::WaitingManualMove;
            if event.is_termination() {
                info!(?event, "Game finished");
            }
            self.event_tx.send(GameEvent::Board(event))?;
            if waiting {
                self.take_turn().await?;
            }
        }

        info!("Board closed, orchestration finished");
        Ok(())
    }

    async fn take_turn(&mut self) -> Result<()> {
        let (fen, white_to_move) = {
            let board = self.session.lock().await;
            // The signal may be stale after a restart or a player change.
            if !board.game_in_progress() || board.authority_now() != Authority::Manual {
                debug!("Side to move is not externally driven, ignoring signal");
                return Ok(());
            }
            (board.current_position(), board.is_white_turn())
        };
        let player = if white_to_move {
            &mut self.white
        } else {
            &mut self.black
        };
        let name = player.name().to_string();

        self.event_tx.send(GameEvent::EngineThinking {
            player: name.clone(),
        })?;

        debug!(player = %name, "Waiting for move");
        match player.get_move(&fen).await {
            Ok(san) => {
                // The position may have changed while the engine was thinking.
                let played = self
                    .session
                    .update(|board| board.current_position() == fen && board.play_move_san(&san))
                    .await;
                if !played {
                    warn!(player = %name, %san, "Engine move discarded");
                }
            }
            Err(e) => {
                warn!(player = %name, error = %e, "Engine failed");
                self.event_tx.send(GameEvent::EngineError {
                    player: name,
                    message: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}
