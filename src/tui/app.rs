//! Application state and input handling.

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use strictly_chess::{BoardEvent, BoardSession, MoveDone};
use tracing::{debug, info, instrument, warn};

use super::input::{PointerAction, PromotionPanel, pointer_action};
use super::layout::BoardLayout;
use super::orchestrator::GameEvent;
use crate::app_config::AppConfig;

/// Main application state.
pub struct App {
    session: BoardSession,
    config: AppConfig,
    layout: Option<BoardLayout>,
    moves: Vec<MoveDone>,
    pgn: Option<String>,
    status_message: String,
    should_quit: bool,
}

impl App {
    /// Creates a new application around a board session.
    pub fn new(session: BoardSession, config: AppConfig) -> Self {
        Self {
            session,
            config,
            layout: None,
            moves: Vec::new(),
            pgn: None,
            status_message: "Drag a piece to move.".to_string(),
            should_quit: false,
        }
    }

    /// Board session handle.
    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    /// Current board placement, if the terminal is large enough.
    pub fn layout(&self) -> Option<BoardLayout> {
        self.layout
    }

    /// Moves played so far.
    pub fn moves(&self) -> &[MoveDone] {
        &self.moves
    }

    /// PGN of the game, while it is being shown.
    pub fn pgn(&self) -> Option<&str> {
        self.pgn.as_deref()
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Places the board in `region` and resizes the controller if needed.
    #[instrument(skip(self))]
    pub async fn fit(&mut self, region: Rect) {
        let layout = BoardLayout::fit(region);
        if layout == self.layout {
            return;
        }
        self.layout = layout;
        if let Some(layout) = layout {
            let width = layout.container_width();
            debug!(width, "Board resized");
            self.session.update(|board| board.resize(width)).await;
        }
    }

    /// Handles an event from the orchestrator.
    pub fn handle_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::Board(BoardEvent::MoveDone(done)) => {
                let mover = if *done.white_turn() {
                    self.config.white_name()
                } else {
                    self.config.black_name()
                };
                self.status_message = format!("{} played {}", mover, done.move_fan());
                self.moves.push(done);
            }
            GameEvent::Board(BoardEvent::Checkmate {
                white_was_checkmated,
            }) => {
                let winner = if white_was_checkmated {
                    self.config.black_name()
                } else {
                    self.config.white_name()
                };
                self.status_message = format!(
                    "Checkmate! {} wins. Press 'n' for a new game or 'q' to quit.",
                    winner
                );
            }
            GameEvent::Board(BoardEvent::Stalemate) => {
                self.status_message = "Draw by stalemate.".to_string();
            }
            GameEvent::Board(BoardEvent::ThreeFoldRepetition) => {
                self.status_message = "Draw by threefold repetition.".to_string();
            }
            GameEvent::Board(BoardEvent::InsufficientMaterial) => {
                self.status_message = "Draw by insufficient material.".to_string();
            }
            GameEvent::Board(BoardEvent::FiftyMovesRule) => {
                self.status_message = "Draw by the fifty-move rule.".to_string();
            }
            GameEvent::Board(BoardEvent::WaitingManualMove) => {
                self.status_message = "Waiting for the engine...".to_string();
            }
            GameEvent::EngineThinking { player } => {
                self.status_message = format!("{} is thinking...", player);
            }
            GameEvent::EngineError { player, message } => {
                self.status_message = format!("{} failed: {}", player, message);
            }
        }
    }

    /// Handles a key press.
    #[instrument(skip(self))]
    pub async fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                info!("User quit");
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                self.session
                    .update(|board| {
                        let reversed = !board.settings().reversed;
                        board.set_reversed(reversed);
                    })
                    .await;
            }
            KeyCode::Char('c') => {
                self.session
                    .update(|board| {
                        let visible = !board.settings().coordinates_visible;
                        board.set_coordinates_visible(visible);
                    })
                    .await;
            }
            KeyCode::Char('a') => {
                self.session
                    .update(|board| {
                        let visible = !board.settings().last_move_visible;
                        board.set_last_move_visible(visible);
                    })
                    .await;
            }
            KeyCode::Char('n') => self.restart().await,
            KeyCode::Char('p') => {
                if self.pgn.take().is_none() {
                    let pgn = self
                        .session
                        .game_pgn(
                            self.config.white_name().clone(),
                            self.config.black_name().clone(),
                            "\n".to_string(),
                            Some(40),
                        )
                        .await;
                    self.pgn = Some(pgn);
                }
            }
            KeyCode::Esc => {
                self.session.update(|board| board.cancel_promotion()).await;
            }
            _ => {}
        }
    }

    /// Handles a mouse event.
    #[instrument(skip(self))]
    pub async fn handle_mouse(&mut self, event: MouseEvent) {
        let Some(layout) = self.layout else {
            return;
        };

        let promotion_pending = self.session.lock().await.gesture().promotion().is_some();
        if promotion_pending {
            if event.kind == MouseEventKind::Down(MouseButton::Left) {
                let panel = PromotionPanel::centered_on(layout.area());
                match panel.choice_at(event.column, event.row) {
                    Some(piece) => {
                        self.session.update(|board| board.commit_promotion(piece)).await;
                    }
                    None => {
                        self.session.update(|board| board.cancel_promotion()).await;
                    }
                }
            }
            return;
        }

        match pointer_action(&layout, event) {
            Some(PointerAction::Down(p)) => {
                self.session.update(|board| board.pointer_down(p.x, p.y)).await;
            }
            Some(PointerAction::Move(p)) => {
                self.session.update(|board| board.pointer_move(p.x, p.y)).await;
            }
            Some(PointerAction::Up(p)) => {
                self.session.update(|board| board.pointer_up(p.x, p.y)).await;
            }
            Some(PointerAction::Leave) => self.pointer_leave().await,
            None => {}
        }
    }

    /// The pointer left the board or the terminal lost focus.
    pub async fn pointer_leave(&mut self) {
        self.session.update(|board| board.pointer_leave()).await;
    }

    /// Starts a new game from the configured position.
    #[instrument(skip(self))]
    pub async fn restart(&mut self) {
        debug!("Restarting game");
        let fen = self.config.start_fen().clone();
        match self.session.update(|board| board.start_new_game(&fen)).await {
            Ok(()) => {
                self.moves.clear();
                self.pgn = None;
                self.status_message = "New game. Drag a piece to move.".to_string();
            }
            Err(e) => {
                warn!(error = %e, "Could not start game");
                self.status_message = format!("Could not start game: {}", e);
            }
        }
    }
}
