//! Adapter around the rules engine.
//!
//! The live position is only changed by [`RulesOracle::commit`] and
//! [`RulesOracle::commit_san`]. Legality probes run against a disposable
//! copy so a rejected proposal can never disturb the game.

use std::collections::HashMap;

use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, Move, Piece, Position, PositionError, Square,
    fen::Fen,
    san::SanPlus,
    uci::UciMove,
};
use tracing::{debug, instrument};

use crate::coords::BoardSquare;
use crate::error::{BoardError, BoardErrorKind, BoardResult};
use crate::notation::GameRecord;
use crate::promotion::PromotionPiece;

/// Halfmove clock value at which the fifty-move rule applies.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// A move that has been applied to the live position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// SAN including check or mate suffix.
    pub san: String,
    /// Origin square (the king's square for castling).
    pub from: BoardSquare,
    /// Target square (the king's destination for castling).
    pub to: BoardSquare,
    /// Promotion choice, if the move promoted.
    pub promotion: Option<PromotionPiece>,
    /// Colour that made the move.
    pub mover: Color,
    /// Full-move number before the move was applied.
    pub move_number: u32,
}

/// Rules engine handle with repetition tracking and move history.
#[derive(Debug, Clone)]
pub struct RulesOracle {
    position: Chess,
    initial_fen: String,
    history: Vec<String>,
    repetitions: HashMap<String, u32>,
    headers: Vec<(String, String)>,
}

impl Default for RulesOracle {
    fn default() -> Self {
        Self::from_position(Chess::default())
    }
}

impl RulesOracle {
    /// Loads a position; an empty string means the standard initial position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardErrorKind::InvalidFen`] if the string does not parse or
    /// describes an impossible setup such as an empty board or a missing
    /// king. Castling rights without their rook or king, and an en-passant
    /// square no pawn could have passed, are discarded instead.
    #[instrument]
    pub fn load(fen: &str) -> BoardResult<Self> {
        let fen = fen.trim();
        if fen.is_empty() {
            return Ok(Self::default());
        }
        let parsed: Fen = fen.parse().map_err(|e| {
            BoardError::new(BoardErrorKind::InvalidFen(format!("{}: {}", fen, e)))
        })?;
        // Stale castling rights and en-passant squares are dropped, not fatal.
        let position = parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .or_else(PositionError::ignore_invalid_castling_rights)
            .or_else(PositionError::ignore_invalid_ep_square)
            .map_err(|e| {
                BoardError::new(BoardErrorKind::InvalidFen(format!("{}: {}", fen, e)))
            })?;
        Ok(Self::from_position(position))
    }

    fn from_position(position: Chess) -> Self {
        let initial_fen = fen_of(&position);
        let mut oracle = Self {
            position,
            initial_fen,
            history: Vec::new(),
            repetitions: HashMap::new(),
            headers: Vec::new(),
        };
        oracle.record_repetition();
        oracle
    }

    /// FEN of the live position.
    pub fn to_fen(&self) -> String {
        fen_of(&self.position)
    }

    /// Whether this handle started from the standard initial position.
    pub fn starts_from_standard(&self) -> bool {
        self.initial_fen == fen_of(&Chess::default())
    }

    /// SAN of every move committed since loading.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.turn()
    }

    /// Current full-move number.
    pub fn fullmoves(&self) -> u32 {
        self.position.fullmoves().get()
    }

    /// Piece standing on `square`, if any.
    pub fn piece_at(&self, square: BoardSquare) -> Option<Piece> {
        self.position.board().piece_at(to_engine_square(square))
    }

    /// Sets (or replaces) a PGN header.
    #[instrument(skip(self))]
    pub fn set_header(&mut self, key: &str, value: &str) {
        match self.headers.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((key.to_string(), value.to_string())),
        }
    }

    /// Finds the legal move matching a proposal without touching the live
    /// position.
    ///
    /// A promotion move only matches when its promotion piece equals
    /// `promotion`; any other move ignores `promotion`.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub fn probe(
        &self,
        from: BoardSquare,
        to: BoardSquare,
        promotion: Option<PromotionPiece>,
    ) -> Option<Move> {
        let scratch = self.position.clone();
        find_move(&scratch, from, to, promotion)
    }

    /// Applies a proposal to the live position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardErrorKind::IllegalMove`] and leaves the position
    /// untouched if no legal move matches.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub fn commit(
        &mut self,
        from: BoardSquare,
        to: BoardSquare,
        promotion: Option<PromotionPiece>,
    ) -> BoardResult<AppliedMove> {
        let m = find_move(&self.position, from, to, promotion).ok_or_else(|| {
            let letter = promotion.map(|p| p.letter().to_string()).unwrap_or_default();
            BoardError::new(BoardErrorKind::IllegalMove(format!("{}{}{}", from, to, letter)))
        })?;
        Ok(self.apply(m))
    }

    /// Parses SAN and applies it to the live position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardErrorKind::InvalidSan`] if the text does not parse or
    /// does not name a legal move.
    #[instrument(skip(self))]
    pub fn commit_san(&mut self, san: &str) -> BoardResult<AppliedMove> {
        let parsed: SanPlus = san.trim().parse().map_err(|e| {
            BoardError::new(BoardErrorKind::InvalidSan(format!("{}: {}", san, e)))
        })?;
        let m = parsed.san.to_move(&self.position).map_err(|e| {
            BoardError::new(BoardErrorKind::InvalidSan(format!("{}: {}", san, e)))
        })?;
        Ok(self.apply(m))
    }

    fn apply(&mut self, m: Move) -> AppliedMove {
        let mover = self.position.turn();
        let move_number = self.fullmoves();
        let (from, to) = match UciMove::from_standard(&m) {
            UciMove::Normal { from, to, .. } => (from, to),
            _ => (m.from().unwrap_or_else(|| m.to()), m.to()),
        };
        let promotion = m.promotion().and_then(PromotionPiece::from_role);

        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, &m).to_string();
        self.history.push(san.clone());
        self.record_repetition();

        debug!(%san, move_number, "Move applied");
        AppliedMove {
            san,
            from: from_engine_square(from),
            to: from_engine_square(to),
            promotion,
            mover,
            move_number,
        }
    }

    fn record_repetition(&mut self) {
        *self.repetitions.entry(repetition_key(&self.position)).or_insert(0) += 1;
    }

    /// Side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    /// Side to move has no legal move and is not in check.
    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    /// The current position has occurred at least three times.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions
            .get(&repetition_key(&self.position))
            .is_some_and(|count| *count >= 3)
    }

    /// Neither side can possibly mate.
    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    /// Any draw condition, including the fifty-move rule.
    pub fn is_draw(&self) -> bool {
        self.position.halfmoves() >= FIFTY_MOVE_HALFMOVES
            || self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
    }

    /// Result token for PGN output.
    pub fn result_token(&self) -> &'static str {
        if self.is_checkmate() {
            match self.position.turn() {
                Color::White => "0-1",
                Color::Black => "1-0",
            }
        } else if self.is_draw() {
            "1/2-1/2"
        } else {
            "*"
        }
    }

    /// Collects headers and moves for PGN rendering.
    ///
    /// `SetUp` and `FEN` tags are added when the game did not start from the
    /// standard position.
    pub fn game_record(&self) -> GameRecord {
        let mut headers = self.headers.clone();
        headers.retain(|(k, _)| k != "Result" && k != "SetUp" && k != "FEN");
        headers.push(("Result".to_string(), self.result_token().to_string()));
        if !self.starts_from_standard() {
            headers.push(("SetUp".to_string(), "1".to_string()));
            headers.push(("FEN".to_string(), self.initial_fen.clone()));
        }

        let (first_move_number, black_moves_first) = initial_turn(&self.initial_fen);
        GameRecord {
            headers,
            first_move_number,
            black_moves_first,
            moves: self.history.clone(),
            result: self.result_token().to_string(),
        }
    }
}

fn find_move(
    position: &Chess,
    from: BoardSquare,
    to: BoardSquare,
    promotion: Option<PromotionPiece>,
) -> Option<Move> {
    let from = to_engine_square(from);
    let to = to_engine_square(to);
    let wanted = promotion.map(PromotionPiece::role);
    position.legal_moves().into_iter().find(|m| match UciMove::from_standard(m) {
        UciMove::Normal {
            from: f,
            to: t,
            promotion: p,
        } => f == from && t == to && (p.is_none() || p == wanted),
        _ => false,
    })
}

fn to_engine_square(square: BoardSquare) -> Square {
    Square::new(u32::from(square.rank()) * 8 + u32::from(square.file()))
}

fn from_engine_square(square: Square) -> BoardSquare {
    BoardSquare::masked(square.file() as u8, square.rank() as u8)
}

fn fen_of(position: &Chess) -> String {
    Fen::from_setup(position.clone().into_setup(EnPassantMode::Legal)).to_string()
}

/// Placement, side to move, castling rights and en-passant square.
fn repetition_key(position: &Chess) -> String {
    fen_of(position)
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full-move number and whether black moves first, read from a FEN.
fn initial_turn(fen: &str) -> (u32, bool) {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let black_first = fields.get(1).is_some_and(|side| *side == "b");
    let number = fields
        .get(5)
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(1);
    (number, black_first)
}
