//! The interactive board controller.
//!
//! [`BoardController`] owns the live position and every piece of transient
//! widget state. Pointer handlers, promotion choices and external move
//! commands all go through `&mut self`, so there is exactly one mutator at a
//! time.
//!
//! Termination detection is deferred: a commit only marks a check as
//! pending, and [`BoardController::settle`] runs it. Every pointer handler
//! settles first, so the check always sees the position produced by the
//! commit and runs before any later human input is accepted.

use chrono::Local;
use derive_new::new;
use serde::{Deserialize, Serialize};
use shakmaty::{Color, Piece};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::arbiter::Authority;
use crate::arrow::{ArrowGeometry, LastMove, compute_arrow};
use crate::coords::{BoardSquare, Point, cell_size, cell_to_square, pixel_to_cell, square_overlay_origin};
use crate::drag::{DragSession, Gesture, PromotionRequest};
use crate::error::{BoardError, BoardErrorKind, BoardResult};
use crate::events::{BoardEvent, MoveDone};
use crate::notation::write_pgn;
use crate::oracle::{AppliedMove, RulesOracle};
use crate::promotion::{PromotionPiece, requires_promotion};
use crate::settings::BoardSettings;

/// An externally driven move given as square indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Origin file index (0 = a).
    pub start_file: u8,
    /// Origin rank index (0 = first rank).
    pub start_rank: u8,
    /// Target file index.
    pub end_file: u8,
    /// Target rank index.
    pub end_rank: u8,
    /// Promotion letter (`n`, `b`, `r` or `q`), if the move promotes.
    #[serde(default)]
    pub promotion: Option<String>,
}

/// A position to display together with the move that led to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    /// Position to load.
    pub position_fen: String,
    /// Origin file index of the last move.
    #[serde(default)]
    pub from_file_index: Option<u8>,
    /// Origin rank index of the last move.
    #[serde(default)]
    pub from_rank_index: Option<u8>,
    /// Target file index of the last move.
    #[serde(default)]
    pub to_file_index: Option<u8>,
    /// Target rank index of the last move.
    #[serde(default)]
    pub to_rank_index: Option<u8>,
}

impl PositionUpdate {
    /// The last move, if all four indices are present and on the board.
    fn last_move(&self) -> Option<LastMove> {
        let from = BoardSquare::new(self.from_file_index?, self.from_rank_index?)?;
        let to = BoardSquare::new(self.to_file_index?, self.to_rank_index?)?;
        Some(LastMove::new(from, to))
    }
}

/// Interactive board controller.
#[derive(Debug)]
pub struct BoardController {
    settings: BoardSettings,
    oracle: RulesOracle,
    start_fen: String,
    gesture: Gesture,
    last_move: Option<LastMove>,
    arrow: Option<ArrowGeometry>,
    running: bool,
    container_width: f64,
    termination_check_pending: bool,
    event_tx: mpsc::UnboundedSender<BoardEvent>,
}

impl BoardController {
    /// Creates an idle controller showing the standard position.
    ///
    /// No game is running until [`start_new_game`](Self::start_new_game).
    #[instrument(skip(event_tx))]
    pub fn new(
        settings: BoardSettings,
        container_width: f64,
        event_tx: mpsc::UnboundedSender<BoardEvent>,
    ) -> Self {
        let oracle = RulesOracle::default();
        let start_fen = oracle.to_fen();
        Self {
            settings,
            oracle,
            start_fen,
            gesture: Gesture::Idle,
            last_move: None,
            arrow: None,
            running: false,
            container_width,
            termination_check_pending: false,
            event_tx,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Starts a game from `fen`, or from the standard position if empty.
    ///
    /// # Errors
    ///
    /// Returns [`BoardErrorKind::InvalidFen`] for a malformed or impossible
    /// position. The previous game state is kept in that case.
    #[instrument(skip(self))]
    pub fn start_new_game(&mut self, fen: &str) -> BoardResult<()> {
        let oracle = RulesOracle::load(fen)?;
        self.start_fen = oracle.to_fen();
        self.oracle = oracle;
        self.gesture = Gesture::Idle;
        self.last_move = None;
        self.recompute_arrow();
        self.termination_check_pending = false;
        self.running = true;
        info!(fen = %self.start_fen, "Game started");

        if !self.human_turn_now() {
            self.emit(BoardEvent::WaitingManualMove);
        }
        Ok(())
    }

    /// Stops the game. The position is left as it is.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if self.running {
            info!("Game stopped");
        }
        self.running = false;
        self.termination_check_pending = false;
        self.gesture = Gesture::Idle;
    }

    /// Whether a game is running.
    pub fn game_in_progress(&self) -> bool {
        self.running
    }

    /// FEN of the live position.
    pub fn current_position(&self) -> String {
        self.oracle.to_fen()
    }

    /// Whether white is to move.
    pub fn is_white_turn(&self) -> bool {
        self.oracle.side_to_move() == Color::White
    }

    /// FEN that [`set_position_and_last_move`](Self::set_position_and_last_move)
    /// rewinds to.
    pub fn rewind_position(&self) -> &str {
        &self.start_fen
    }

    /// Loads a position and its last move for display.
    ///
    /// Only allowed while no game is running. With a non-empty position and
    /// four in-range indices the position is shown with its arrow and `true`
    /// is returned. Anything else rewinds to the recorded starting position,
    /// clears the last move and returns `false`.
    #[instrument(skip(self))]
    pub fn set_position_and_last_move(&mut self, update: &PositionUpdate) -> bool {
        if self.running {
            warn!("Refusing to replace the position of a running game");
            return false;
        }
        self.gesture = Gesture::Idle;

        let loaded = match (update.position_fen.trim().is_empty(), update.last_move()) {
            (false, Some(last_move)) => match RulesOracle::load(&update.position_fen) {
                Ok(oracle) => Some((oracle, last_move)),
                Err(e) => {
                    debug!(error = %e, "Position rejected");
                    None
                }
            },
            _ => None,
        };

        let success = match loaded {
            Some((oracle, last_move)) => {
                self.oracle = oracle;
                self.last_move = Some(last_move);
                true
            }
            None => {
                self.oracle = RulesOracle::load(&self.start_fen).unwrap_or_default();
                self.last_move = None;
                debug!(fen = %self.start_fen, "Rewound to starting position");
                false
            }
        };
        self.recompute_arrow();
        success
    }

    /// Renders the game as PGN.
    ///
    /// Sets the seven-tag roster (with today's date) on the game before
    /// rendering. `newline` separates lines; `max_width` wraps the movetext.
    #[instrument(skip(self))]
    pub fn game_pgn(
        &mut self,
        white_name: &str,
        black_name: &str,
        newline: &str,
        max_width: Option<usize>,
    ) -> String {
        let date = Local::now().format("%Y.%m.%d").to_string();
        self.oracle.set_header("Event", "Casual game");
        self.oracle.set_header("Site", "?");
        self.oracle.set_header("Date", &date);
        self.oracle.set_header("Round", "?");
        self.oracle.set_header("White", white_name);
        self.oracle.set_header("Black", black_name);
        write_pgn(&self.oracle.game_record(), newline, max_width)
    }

    // ─────────────────────────────────────────────────────────────
    // Pointer gestures
    // ─────────────────────────────────────────────────────────────

    /// Pointer pressed at widget pixel `(x, y)`.
    ///
    /// Starts a drag when the game runs, no promotion is pending, the side
    /// to move is pointer-controlled and the square holds one of its pieces.
    /// Returns whether a drag started.
    #[instrument(skip(self))]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.settle();
        if !self.running || self.gesture.promotion().is_some() || !self.human_turn_now() {
            return false;
        }
        if self.gesture.cancel_drag() {
            debug!("Stale drag replaced");
        }

        let Some(origin) = self.square_at(x, y) else {
            return false;
        };
        let Some(piece) = self.oracle.piece_at(origin) else {
            return false;
        };
        if piece.color != self.oracle.side_to_move() {
            return false;
        }

        debug!(%origin, ?piece, "Drag started");
        self.gesture = Gesture::Dragging(DragSession {
            origin,
            piece,
            pointer: Point::new(x, y),
            hovered: Some(origin),
        });
        true
    }

    /// Pointer moved to `(x, y)`. Only an active drag is updated.
    #[instrument(skip(self), level = "trace")]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.settle();
        let hovered = self.square_at(x, y);
        self.gesture.track(Point::new(x, y), hovered);
    }

    /// Pointer released at `(x, y)`.
    ///
    /// An illegal drop or a drop off the board cancels the drag. A pawn
    /// reaching the last rank enters the promotion choice instead of
    /// committing. Returns whether a move was committed.
    #[instrument(skip(self))]
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.settle();
        let Some(session) = self.gesture.take_drag() else {
            return false;
        };
        if !self.running {
            return false;
        }
        let Some(target) = self.square_at(x, y) else {
            debug!(origin = %session.origin, "Dropped off the board");
            return false;
        };

        // Promotion moves only match with a piece, so probe with a queen.
        if self
            .oracle
            .probe(session.origin, target, Some(PromotionPiece::Queen))
            .is_none()
        {
            debug!(origin = %session.origin, %target, "Illegal drop");
            return false;
        }

        if requires_promotion(session.piece, session.origin, target) {
            let overlay =
                square_overlay_origin(target, self.settings.reversed, self.cell_size());
            debug!(origin = %session.origin, %target, "Awaiting promotion choice");
            self.gesture = Gesture::PendingPromotion(PromotionRequest {
                origin: session.origin,
                target,
                piece: session.piece,
                overlay,
            });
            return false;
        }

        self.commit(session.origin, target, None).is_ok()
    }

    /// Pointer left the widget. Cancels an active drag only.
    #[instrument(skip(self))]
    pub fn pointer_leave(&mut self) {
        self.settle();
        self.gesture.cancel_drag();
    }

    /// Completes a pending promotion with `piece`.
    ///
    /// Returns `false` without side effects when no promotion is pending.
    #[instrument(skip(self))]
    pub fn commit_promotion(&mut self, piece: PromotionPiece) -> bool {
        self.settle();
        if !self.running {
            return false;
        }
        let Some(request) = self.gesture.promotion().copied() else {
            debug!("No promotion pending");
            return false;
        };
        self.gesture = Gesture::Idle;
        match self.commit(request.origin, request.target, Some(piece)) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Promotion could not be committed");
                false
            }
        }
    }

    /// Completes a pending promotion from a piece letter.
    ///
    /// Letters other than `n`, `b`, `r` and `q` are ignored.
    #[instrument(skip(self))]
    pub fn commit_promotion_letter(&mut self, letter: &str) -> bool {
        match PromotionPiece::from_str_letter(letter) {
            Some(piece) => self.commit_promotion(piece),
            None => {
                debug!("Unknown promotion letter");
                false
            }
        }
    }

    /// Abandons a pending promotion. The position is unchanged.
    #[instrument(skip(self))]
    pub fn cancel_promotion(&mut self) -> bool {
        self.settle();
        if self.gesture.promotion().is_some() {
            debug!("Promotion cancelled");
            self.gesture = Gesture::Idle;
            true
        } else {
            false
        }
    }

    // ─────────────────────────────────────────────────────────────
    // External moves
    // ─────────────────────────────────────────────────────────────

    /// Plays a move for an externally driven side.
    ///
    /// Returns `false` if the game is not running, it is the pointer's turn,
    /// an index or promotion letter is out of range, or the move is illegal.
    #[instrument(skip(self))]
    pub fn play_move(&mut self, request: &MoveRequest) -> bool {
        match self.try_play_move(request) {
            Ok(applied) => {
                debug!(san = %applied.san, "External move played");
                true
            }
            Err(e) => {
                warn!(error = %e, "External move refused");
                false
            }
        }
    }

    /// Plays a SAN move for an externally driven side.
    #[instrument(skip(self))]
    pub fn play_move_san(&mut self, san: &str) -> bool {
        match self.try_play_move_san(san) {
            Ok(applied) => {
                debug!(san = %applied.san, "External move played");
                true
            }
            Err(e) => {
                warn!(error = %e, "External move refused");
                false
            }
        }
    }

    /// Fallible form of [`play_move`](Self::play_move).
    ///
    /// # Errors
    ///
    /// Reports why the move was refused.
    pub fn try_play_move(&mut self, request: &MoveRequest) -> BoardResult<AppliedMove> {
        self.settle_quietly();
        self.ensure_manual_turn()?;
        let from = BoardSquare::new(request.start_file, request.start_rank).ok_or_else(|| {
            BoardError::new(BoardErrorKind::SquareOutOfRange(
                request.start_file,
                request.start_rank,
            ))
        })?;
        let to = BoardSquare::new(request.end_file, request.end_rank).ok_or_else(|| {
            BoardError::new(BoardErrorKind::SquareOutOfRange(
                request.end_file,
                request.end_rank,
            ))
        })?;
        let promotion = match request.promotion.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(letter) => Some(PromotionPiece::from_str_letter(letter).ok_or_else(|| {
                BoardError::new(BoardErrorKind::IllegalMove(format!(
                    "{}{} with promotion '{}'",
                    from, to, letter
                )))
            })?),
        };
        self.commit(from, to, promotion)
    }

    /// Fallible form of [`play_move_san`](Self::play_move_san).
    ///
    /// # Errors
    ///
    /// Reports why the move was refused.
    pub fn try_play_move_san(&mut self, san: &str) -> BoardResult<AppliedMove> {
        self.settle_quietly();
        self.ensure_manual_turn()?;
        let applied = self.oracle.commit_san(san)?;
        self.after_commit(&applied);
        Ok(applied)
    }

    fn ensure_manual_turn(&self) -> BoardResult<()> {
        if !self.running {
            return Err(BoardError::new(BoardErrorKind::GameNotRunning));
        }
        if self.gesture.promotion().is_some() {
            return Err(BoardError::new(BoardErrorKind::PromotionPending));
        }
        if self.human_turn_now() {
            return Err(BoardError::new(BoardErrorKind::NotManualTurn));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // Commit and termination
    // ─────────────────────────────────────────────────────────────

    fn commit(
        &mut self,
        from: BoardSquare,
        to: BoardSquare,
        promotion: Option<PromotionPiece>,
    ) -> BoardResult<AppliedMove> {
        let applied = self.oracle.commit(from, to, promotion)?;
        self.after_commit(&applied);
        Ok(applied)
    }

    fn after_commit(&mut self, applied: &AppliedMove) {
        self.emit(BoardEvent::MoveDone(MoveDone::from(applied)));
        self.last_move = Some(LastMove::new(applied.from, applied.to));
        self.recompute_arrow();
        self.termination_check_pending = true;
    }

    /// Whether a termination check is waiting to run.
    pub fn termination_check_pending(&self) -> bool {
        self.termination_check_pending
    }

    /// Runs the pending termination check, if any.
    ///
    /// Safe to call any number of times; a check runs at most once per
    /// commit.
    #[instrument(skip(self))]
    pub fn settle(&mut self) {
        if self.termination_check_pending {
            self.run_termination_check(true);
        }
    }

    /// Settles before an external move. The caller is supplying the move,
    /// so no waiting signal is emitted.
    fn settle_quietly(&mut self) {
        if self.termination_check_pending {
            self.run_termination_check(false);
        }
    }

    fn run_termination_check(&mut self, announce_waiting: bool) {
        self.termination_check_pending = false;
        if !self.running {
            return;
        }

        let ending = if self.oracle.is_checkmate() {
            Some(BoardEvent::Checkmate {
                white_was_checkmated: self.oracle.side_to_move() == Color::White,
            })
        } else if self.oracle.is_stalemate() {
            Some(BoardEvent::Stalemate)
        } else if self.oracle.is_threefold_repetition() {
            Some(BoardEvent::ThreeFoldRepetition)
        } else if self.oracle.is_insufficient_material() {
            Some(BoardEvent::InsufficientMaterial)
        } else if self.oracle.is_draw() {
            Some(BoardEvent::FiftyMovesRule)
        } else {
            None
        };

        match ending {
            Some(event) => {
                self.running = false;
                self.gesture = Gesture::Idle;
                info!(?event, "Game over");
                self.emit(event);
            }
            None if announce_waiting && !self.human_turn_now() => {
                self.emit(BoardEvent::WaitingManualMove);
            }
            None => {}
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Layout and configuration
    // ─────────────────────────────────────────────────────────────

    /// Flips the board orientation.
    #[instrument(skip(self))]
    pub fn set_reversed(&mut self, reversed: bool) {
        self.settings.reversed = reversed;
        self.relayout();
    }

    /// Updates the container width in pixels.
    #[instrument(skip(self))]
    pub fn resize(&mut self, container_width: f64) {
        self.container_width = container_width;
        self.relayout();
    }

    /// Shows or hides the last-move arrow.
    #[instrument(skip(self))]
    pub fn set_last_move_visible(&mut self, visible: bool) {
        self.settings.last_move_visible = visible;
    }

    /// Shows or hides the coordinate labels.
    #[instrument(skip(self))]
    pub fn set_coordinates_visible(&mut self, visible: bool) {
        self.settings.coordinates_visible = visible;
    }

    /// Sets which sides move with the pointer.
    #[instrument(skip(self))]
    pub fn set_players(&mut self, white_human: bool, black_human: bool) {
        self.settings.white_player_human = white_human;
        self.settings.black_player_human = black_human;
    }

    /// Whether the pointer owns the current move.
    pub fn human_turn_now(&self) -> bool {
        self.authority_now() == Authority::Pointer
    }

    /// Who submits the current move.
    pub fn authority_now(&self) -> Authority {
        self.settings.roster().authority(self.oracle.side_to_move())
    }

    fn relayout(&mut self) {
        let reversed = self.settings.reversed;
        let size = self.cell_size();
        if let Gesture::PendingPromotion(request) = &mut self.gesture {
            request.pin(reversed, size);
            return;
        }
        self.recompute_arrow();
    }

    fn recompute_arrow(&mut self) {
        self.arrow = compute_arrow(self.last_move, self.settings.reversed, self.container_width);
    }

    // ─────────────────────────────────────────────────────────────
    // Read access for renderers
    // ─────────────────────────────────────────────────────────────

    /// Current settings.
    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    /// Current gesture state.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Most recent committed (or displayed) move.
    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// Arrow overlay, if there is a last move and the arrow is visible.
    pub fn arrow(&self) -> Option<&ArrowGeometry> {
        if self.settings.last_move_visible {
            self.arrow.as_ref()
        } else {
            None
        }
    }

    /// Piece on `square`.
    pub fn piece_at(&self, square: BoardSquare) -> Option<Piece> {
        self.oracle.piece_at(square)
    }

    /// Container width in pixels.
    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Side length of one grid cell in pixels.
    pub fn cell_size(&self) -> f64 {
        cell_size(self.container_width)
    }

    /// Square under widget pixel `(x, y)` for the current orientation.
    pub fn square_at(&self, x: f64, y: f64) -> Option<BoardSquare> {
        pixel_to_cell(x, y, self.container_width)
            .map(|cell| cell_to_square(cell, self.settings.reversed))
    }

    fn emit(&self, event: BoardEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("Board event receiver dropped");
        }
    }
}
