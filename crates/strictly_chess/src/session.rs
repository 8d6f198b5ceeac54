//! Shared async handle to a board controller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard, mpsc};
use tracing::{debug, instrument};

use crate::controller::{BoardController, MoveRequest};
use crate::events::BoardEvent;
use crate::settings::BoardSettings;

/// Default delay between a commit and its termination check.
pub const DEFAULT_TERMINATION_DELAY: Duration = Duration::from_millis(50);

/// Cloneable handle that serializes access to one [`BoardController`] and
/// schedules deferred termination checks on the tokio runtime.
#[derive(Debug, Clone)]
pub struct BoardSession {
    inner: Arc<Mutex<BoardController>>,
    termination_delay: Duration,
}

impl BoardSession {
    /// Creates a session and the receiver for its notifications.
    #[instrument]
    pub fn new(
        settings: BoardSettings,
        container_width: f64,
        termination_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<BoardEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let controller = BoardController::new(settings, container_width, event_tx);
        (
            Self {
                inner: Arc::new(Mutex::new(controller)),
                termination_delay,
            },
            event_rx,
        )
    }

    /// Locks the controller for direct access.
    ///
    /// Callers that commit moves through the guard should call
    /// [`schedule_settle`](Self::schedule_settle) afterwards.
    pub async fn lock(&self) -> MutexGuard<'_, BoardController> {
        self.inner.lock().await
    }

    /// Runs `f` against the controller and schedules a termination check if
    /// it left one pending.
    pub async fn update<R>(&self, f: impl FnOnce(&mut BoardController) -> R) -> R {
        let (result, pending) = {
            let mut controller = self.inner.lock().await;
            let result = f(&mut controller);
            (result, controller.termination_check_pending())
        };
        if pending {
            self.schedule_settle();
        }
        result
    }

    /// Plays an external move. See [`BoardController::play_move`].
    #[instrument(skip(self))]
    pub async fn play_move(&self, request: MoveRequest) -> bool {
        self.update(|board| board.play_move(&request)).await
    }

    /// Plays an external SAN move. See [`BoardController::play_move_san`].
    #[instrument(skip(self))]
    pub async fn play_move_san(&self, san: String) -> bool {
        self.update(|board| board.play_move_san(&san)).await
    }

    /// Renders the game as PGN. See [`BoardController::game_pgn`].
    #[instrument(skip(self))]
    pub async fn game_pgn(
        &self,
        white_name: String,
        black_name: String,
        newline: String,
        max_width: Option<usize>,
    ) -> String {
        self.update(|board| board.game_pgn(&white_name, &black_name, &newline, max_width))
            .await
    }

    /// Spawns the deferred termination check.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule_settle(&self) {
        let inner = Arc::clone(&self.inner);
        let delay = self.termination_delay;
        debug!(?delay, "Scheduling termination check");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.lock().await.settle();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deferred_check_emits_waiting() {
        let settings = BoardSettings::default()
            .with_white_player_human(false)
            .with_black_player_human(false);
        let (session, mut rx) = BoardSession::new(settings, 400.0, Duration::from_millis(5));
        session
            .update(|board| board.start_new_game(""))
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some(BoardEvent::WaitingManualMove));

        assert!(session.play_move_san("e4".to_string()).await);
        assert!(matches!(rx.recv().await, Some(BoardEvent::MoveDone(_))));
        assert_eq!(rx.recv().await, Some(BoardEvent::WaitingManualMove));
        assert!(!session.lock().await.termination_check_pending());
    }
}
