//! Game state and move validation.
//!
//! [`GameState`] owns the board and everything the rules need besides it:
//! whose turn it is, the en passant target, cached check flags, captured
//! pieces and the move history. All moves enter through
//! [`attempt_move`](GameState::attempt_move), which validates, commits and
//! reports the outcome as a [`MoveResult`].

use crate::board::MoveEffects;
use crate::movegen::pseudo_legal_targets;
use crate::strategy::king_home;
use crate::{Board, SquareSet};
use chess_model::{
    CastlingRights, Color, Fen, FenError, GameStatus, MoveRecord, MoveResult, Piece, PieceKind,
    Square,
};
use std::fmt;
use thiserror::Error;

/// Errors returned by [`GameState::promote`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PromotionError {
    #[error("no promotion is pending")]
    NotPending,

    #[error("promotion is pending on {expected}, not {given}")]
    WrongSquare { expected: Square, given: Square },

    #[error("square ({file}, {rank}) is off the board")]
    OffBoard { file: i32, rank: i32 },

    #[error("a pawn cannot promote to a {0}")]
    InvalidChoice(PieceKind),
}

/// What the game is waiting for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The side to move may move.
    AwaitingMove,
    /// A pawn stands on its last rank and must be promoted before play goes on.
    AwaitingPromotion { square: Square },
}

/// A chess game in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    /// Square a pawn passed over on the previous half-move.
    pub(crate) en_passant: Option<Square>,
    /// Cached check flags indexed by [`Color::index`], refreshed after each commit.
    in_check: [bool; 2],
    captured: Vec<Piece>,
    history: Vec<MoveRecord>,
    phase: Phase,
    /// Record of a move held back until its promotion is chosen.
    pending: Option<MoveRecord>,
    fullmove_number: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a game in the standard starting position with White to move.
    pub fn new() -> Self {
        GameState {
            board: Board::standard(),
            side_to_move: Color::White,
            en_passant: None,
            in_check: [false; 2],
            captured: Vec::new(),
            history: Vec::new(),
            phase: Phase::AwaitingMove,
            pending: None,
            fullmove_number: 1,
        }
    }

    /// Sets up a game from a FEN string.
    ///
    /// Castling rights decide which kings and rooks count as unmoved: a king
    /// without any right is marked moved, as is a rook whose right is absent.
    /// Pawns off their starting rank are marked moved. The halfmove clock is
    /// read but not kept.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fen = Fen::parse(fen)?;
        let mut board = Board::empty();
        for sq in Square::all() {
            if let Some((kind, color)) = fen.piece_at(sq) {
                let piece = Piece::new(color, kind, sq);
                let piece = if starts_moved(piece, fen.castling) {
                    piece.moved()
                } else {
                    piece
                };
                board.place(piece);
            }
        }

        let mut state = GameState {
            board,
            side_to_move: fen.side_to_move,
            en_passant: fen.en_passant,
            in_check: [false; 2],
            captured: Vec::new(),
            history: Vec::new(),
            phase: Phase::AwaitingMove,
            pending: None,
            fullmove_number: fen.fullmove_number.max(1),
        };
        state.refresh_check_flags();
        Ok(state)
    }

    /// Serializes the position as FEN.
    ///
    /// Castling rights are derived from the moved flags of kings and corner
    /// rooks. The halfmove clock is always written as 0.
    pub fn to_fen(&self) -> String {
        let mut placement = [[None; 8]; 8];
        for piece in self.board.pieces() {
            let sq = piece.position();
            placement[sq.rank() as usize][sq.file() as usize] = Some((piece.kind(), piece.color()));
        }
        let castling = CastlingRights {
            white_kingside: self.may_castle(Color::White, 7),
            white_queenside: self.may_castle(Color::White, 0),
            black_kingside: self.may_castle(Color::Black, 7),
            black_queenside: self.may_castle(Color::Black, 0),
        };
        Fen {
            placement,
            side_to_move: self.side_to_move,
            castling,
            en_passant: self.en_passant,
            halfmove_clock: 0,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    fn may_castle(&self, color: Color, rook_file: i32) -> bool {
        let unmoved = |sq: Option<Square>, kind: PieceKind| {
            sq.and_then(|sq| self.board.piece_at(sq)).is_some_and(|p| {
                p.kind() == kind && p.color() == color && !p.has_moved()
            })
        };
        unmoved(king_home(color), PieceKind::King)
            && unmoved(
                Square::new(rook_file, color.back_rank() as i32),
                PieceKind::Rook,
            )
    }

    /// Returns the board.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.board.piece_at(sq)
    }

    /// Returns the piece at signed coordinates; off-board coordinates hold nothing.
    pub fn piece_at_coords(&self, file: i32, rank: i32) -> Option<&Piece> {
        Square::new(file, rank).and_then(|sq| self.board.piece_at(sq))
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn is_white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    /// Returns the current en passant target square.
    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns whether `color`'s king was attacked after the last committed move.
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.in_check[color.index()]
    }

    #[inline]
    pub fn is_white_in_check(&self) -> bool {
        self.is_in_check(Color::White)
    }

    #[inline]
    pub fn is_black_in_check(&self) -> bool {
        self.is_in_check(Color::Black)
    }

    /// Returns whether `color`'s king is attacked on the board as it stands.
    ///
    /// Unlike [`is_in_check`](Self::is_in_check) this is computed on demand,
    /// so it stays correct while a trial move is applied.
    pub fn king_in_check(&self, color: Color) -> bool {
        self.board
            .king_square(color)
            .is_some_and(|king| self.board.is_attacked(king, color.opposite()))
    }

    /// Returns true if any piece of `by` attacks `sq`.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.board.is_attacked(sq, by)
    }

    /// Pieces captured so far, in capture order.
    #[inline]
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// Committed moves, oldest first.
    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the squares the piece on `from` may legally move to.
    ///
    /// Empty when `from` is empty, holds a piece of the side not to move, or
    /// while a promotion is pending.
    pub fn legal_moves_for(&self, from: Square) -> SquareSet {
        if self.phase != Phase::AwaitingMove {
            return SquareSet::EMPTY;
        }
        let Some(piece) = self.board.piece_at(from).copied() else {
            return SquareSet::EMPTY;
        };
        if piece.color() != self.side_to_move {
            return SquareSet::EMPTY;
        }
        let pseudo = pseudo_legal_targets(&piece, &self.board, self.en_passant);
        let color = piece.color();
        let Some(king) = self.board.king_square(color) else {
            return pseudo;
        };

        let mut scratch = self.board.clone();
        let mut legal = SquareSet::EMPTY;
        for to in pseudo {
            let Some(effects) = scratch.make_move(from, to, self.en_passant, None) else {
                continue;
            };
            let king = if piece.kind() == PieceKind::King { to } else { king };
            let safe = !scratch.is_attacked(king, color.opposite());
            scratch.unmake_move(&effects);
            if safe {
                legal.insert(to);
            }
        }
        debug_assert!(scratch == self.board, "legal move filter left the board modified");
        legal
    }

    /// Returns every legal move of the side to move, by origin square then target.
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        self.board
            .pieces_of(self.side_to_move)
            .map(Piece::position)
            .flat_map(|from| self.legal_moves_for(from).iter().map(move |to| (from, to)))
            .collect()
    }

    /// Returns true if the side to move has at least one legal move.
    pub fn has_legal_move(&self) -> bool {
        self.board
            .pieces_of(self.side_to_move)
            .any(|p| !self.legal_moves_for(p.position()).is_empty())
    }

    /// Classifies the position for the side to move.
    ///
    /// A pending promotion is reported as in progress.
    pub fn game_status(&self) -> GameStatus {
        if self.phase != Phase::AwaitingMove || self.has_legal_move() {
            GameStatus::InProgress
        } else if self.king_in_check(self.side_to_move) {
            GameStatus::checkmated(self.side_to_move)
        } else {
            GameStatus::Stalemate
        }
    }

    /// Validates and commits the move `from` -> `to`.
    ///
    /// Returns [`MoveResult::Invalid`] without changing anything when the
    /// origin is empty, holds an opposing piece, the target is not a legal
    /// destination, or a promotion is pending. A pawn reaching its last rank
    /// is committed but the turn does not pass until [`promote`](Self::promote)
    /// is called.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> MoveResult {
        if let Phase::AwaitingPromotion { square } = self.phase {
            tracing::trace!(%from, %to, pending = %square, "move rejected: promotion pending");
            return MoveResult::Invalid;
        }
        let Some(piece) = self.board.piece_at(from).copied() else {
            tracing::trace!(%from, %to, "move rejected: empty origin");
            return MoveResult::Invalid;
        };
        if piece.color() != self.side_to_move {
            tracing::trace!(%from, %to, "move rejected: not {}'s piece", self.side_to_move);
            return MoveResult::Invalid;
        }
        if !self.legal_moves_for(from).contains(to) {
            tracing::trace!(%from, %to, "move rejected: not a legal destination");
            return MoveResult::Invalid;
        }

        let Some(effects) = self.board.make_move(from, to, self.en_passant, None) else {
            return MoveResult::Invalid;
        };
        self.en_passant = effects.passed_over;
        if let Some(captured) = effects.captured {
            self.captured.push(captured);
        }
        let record = self.record_for(&effects);

        if effects.reaches_last_rank() {
            self.phase = Phase::AwaitingPromotion { square: to };
            self.pending = Some(record);
            tracing::debug!(%from, %to, "pawn reached last rank, awaiting promotion");
            return MoveResult::PromotionRequired;
        }

        self.finish_turn(record);
        MoveResult::Success
    }

    /// Coordinate form of [`attempt_move`](Self::attempt_move); off-board
    /// coordinates are invalid.
    pub fn attempt_move_coords(
        &mut self,
        from_file: i32,
        from_rank: i32,
        to_file: i32,
        to_rank: i32,
    ) -> MoveResult {
        match Square::new(from_file, from_rank).zip(Square::new(to_file, to_rank)) {
            Some((from, to)) => self.attempt_move(from, to),
            None => {
                tracing::trace!(from_file, from_rank, to_file, to_rank, "move rejected: off board");
                MoveResult::Invalid
            }
        }
    }

    /// Replaces the pawn awaiting promotion on `at` with a piece of `kind`.
    ///
    /// Completes the move: the turn passes and check flags are refreshed.
    /// Nothing changes on error.
    pub fn promote(&mut self, at: Square, kind: PieceKind) -> Result<(), PromotionError> {
        let Phase::AwaitingPromotion { square } = self.phase else {
            return Err(PromotionError::NotPending);
        };
        if at != square {
            return Err(PromotionError::WrongSquare {
                expected: square,
                given: at,
            });
        }
        if !kind.is_promotion_choice() {
            return Err(PromotionError::InvalidChoice(kind));
        }

        let Some(pawn) = self.board.take(at) else {
            debug_assert!(false, "no pawn on pending promotion square {at}");
            return Err(PromotionError::NotPending);
        };
        debug_assert_eq!(pawn.kind(), PieceKind::Pawn);
        self.board.place(Piece::new(pawn.color(), kind, at).moved());
        self.phase = Phase::AwaitingMove;

        tracing::debug!(square = %at, %kind, "pawn promoted");
        if let Some(mut record) = self.pending.take() {
            record.promotion = Some(kind);
            self.finish_turn(record);
        } else {
            self.pass_turn();
        }
        Ok(())
    }

    /// Coordinate form of [`promote`](Self::promote).
    pub fn promote_coords(
        &mut self,
        file: i32,
        rank: i32,
        kind: PieceKind,
    ) -> Result<(), PromotionError> {
        let at = Square::new(file, rank).ok_or(PromotionError::OffBoard { file, rank })?;
        self.promote(at, kind)
    }

    fn record_for(&self, effects: &MoveEffects) -> MoveRecord {
        MoveRecord {
            ply: self.history.len() as u32 + 1,
            color: effects.mover.color(),
            from: effects.mover.position(),
            to: effects.to,
            piece: effects.mover.kind(),
            captured: effects.captured.map(|p| p.kind()),
            en_passant: effects.is_en_passant(),
            castle: effects.castle.map(|shift| shift.side),
            promotion: effects.promotion,
            check: false,
            checkmate: false,
        }
    }

    fn pass_turn(&mut self) {
        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = self.side_to_move.opposite();
        self.refresh_check_flags();
    }

    fn finish_turn(&mut self, mut record: MoveRecord) {
        self.pass_turn();
        record.check = self.is_in_check(self.side_to_move);
        record.checkmate = record.check && !self.has_legal_move();
        tracing::debug!(ply = record.ply, mv = %record, "move committed");
        self.history.push(record);
    }

    pub(crate) fn refresh_check_flags(&mut self) {
        for color in Color::BOTH {
            self.in_check[color.index()] = self.king_in_check(color);
        }
    }
}

/// Whether a piece loaded from FEN should count as having moved.
fn starts_moved(piece: Piece, castling: CastlingRights) -> bool {
    let color = piece.color();
    let sq = piece.position();
    let on_back_rank = sq.rank() == color.back_rank();
    match piece.kind() {
        PieceKind::Pawn => sq.rank() != color.pawn_rank(),
        PieceKind::King => {
            Some(sq) != king_home(color)
                || !(castling.kingside(color) || castling.queenside(color))
        }
        PieceKind::Rook => {
            let kingside = on_back_rank && sq.file() == 7 && castling.kingside(color);
            let queenside = on_back_rank && sq.file() == 0 && castling.queenside(color);
            !(kingside || queenside)
        }
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => false,
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        write!(f, "\n{} to move", self.side_to_move)?;
        if self.is_in_check(self.side_to_move) {
            write!(f, " (check)")?;
        }
        Ok(())
    }
}
