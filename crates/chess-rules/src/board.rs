//! The 8x8 grid of pieces.

use crate::strategy;
use chess_model::{CastleSide, Color, Piece, PieceKind, Square};
use std::fmt;

/// An 8x8 mapping from squares to optional pieces.
///
/// Every stored piece records the square it is stored on. All mutation goes
/// through [`place`](Board::place), [`take`](Board::take) and
/// [`relocate`](Board::relocate), which keep that correspondence.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting arrangement.
    pub fn standard() -> Self {
        const BACK_ROW: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for color in Color::BOTH {
            for (file, kind) in BACK_ROW.iter().enumerate() {
                let file = file as i32;
                if let Some(sq) = Square::new(file, color.back_rank() as i32) {
                    board.place(Piece::new(color, *kind, sq));
                }
                if let Some(sq) = Square::new(file, color.pawn_rank() as i32) {
                    board.place(Piece::new(color, PieceKind::Pawn, sq));
                }
            }
        }
        board
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.squares[sq.index()].as_ref()
    }

    #[inline]
    pub(crate) fn piece_at_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.squares[sq.index()].as_mut()
    }

    /// Returns true if no piece stands on `sq`.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    /// Returns the color of the piece on `sq`, if any.
    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(Piece::color)
    }

    /// Stores `piece` on the square it records, returning whatever stood there.
    pub fn place(&mut self, piece: Piece) -> Option<Piece> {
        self.squares[piece.position().index()].replace(piece)
    }

    /// Removes and returns the piece on `sq`.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    /// Moves the piece on `from` to `to`, updating its recorded position.
    ///
    /// Returns the piece previously standing on `to`. Does nothing and
    /// returns `None` when `from` is empty.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut piece = self.take(from)?;
        piece.set_position(to);
        self.place(piece)
    }

    /// Iterates over all pieces, rank by rank from the top.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.squares.iter().flatten()
    }

    /// Iterates over the pieces of one color, rank by rank from the top.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |p| p.color() == color)
    }

    /// Returns the square of `color`'s king.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|p| p.kind() == PieceKind::King)
            .map(Piece::position)
    }

    /// Returns true if any piece of `by` attacks `sq`.
    ///
    /// Only the basic movement geometry counts: castling never attacks, and
    /// pawns attack their forward diagonals whether or not a capture is
    /// currently possible.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.pieces_of(by)
            .any(|piece| strategy::attacks(piece, sq, self))
    }

    /// Returns the square of the pawn `pawn` would take en passant by
    /// stepping diagonally onto `to`.
    ///
    /// `to` must be the empty en passant target and the square beside the
    /// pawn on the target's file must hold an opposing pawn.
    pub fn en_passant_victim(
        &self,
        pawn: &Piece,
        to: Square,
        en_passant: Option<Square>,
    ) -> Option<Square> {
        let from = pawn.position();
        let diagonal = from.file().abs_diff(to.file()) == 1
            && to.rank() as i32 - from.rank() as i32 == pawn.color().pawn_direction();
        if pawn.kind() != PieceKind::Pawn
            || !diagonal
            || en_passant != Some(to)
            || !self.is_empty(to)
        {
            return None;
        }
        let victim = Square::new(to.file() as i32, from.rank() as i32)?;
        self.piece_at(victim)
            .is_some_and(|p| p.kind() == PieceKind::Pawn && p.color() != pawn.color())
            .then_some(victim)
    }

    /// Returns true if every stored piece records the square it is stored on.
    pub fn is_consistent(&self) -> bool {
        self.squares
            .iter()
            .enumerate()
            .all(|(index, cell)| cell.map_or(true, |p| p.position().index() == index))
    }
}

/// A rook carried along by a castling king.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RookShift {
    pub side: CastleSide,
    /// The rook as it stood before castling.
    pub rook: Piece,
    pub to: Square,
}

/// Everything [`Board::make_move`] changed, enough to reverse it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a move that is not unmade leaves the board modified"]
pub struct MoveEffects {
    /// The moving piece as it stood before the move.
    pub mover: Piece,
    pub to: Square,
    /// The captured piece, still recording the square it was taken from.
    pub captured: Option<Piece>,
    pub castle: Option<RookShift>,
    pub promotion: Option<PieceKind>,
    /// The square a pawn double step passed over.
    pub passed_over: Option<Square>,
}

impl MoveEffects {
    /// Returns true if the capture happened off the destination square.
    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.captured.is_some_and(|p| p.position() != self.to)
    }

    /// Returns true if the moving pawn stands on its last rank.
    #[inline]
    pub fn reaches_last_rank(&self) -> bool {
        self.mover.kind() == PieceKind::Pawn
            && self.to.rank() == self.mover.color().promotion_rank()
    }
}

impl Board {
    /// Applies the move `from` -> `to` without checking its legality.
    ///
    /// Resolution order: the capture is removed (off the destination square
    /// for en passant), a castling rook is relocated, the mover is relocated
    /// and marked moved, then a pawn on its last rank becomes `promotion` if
    /// one is given. Returns `None`, leaving the board untouched, when `from`
    /// is empty.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        en_passant: Option<Square>,
        promotion: Option<PieceKind>,
    ) -> Option<MoveEffects> {
        let mover = *self.piece_at(from)?;
        let color = mover.color();
        let is_pawn = mover.kind() == PieceKind::Pawn;
        let file_delta = to.file() as i32 - from.file() as i32;
        let rank_delta = to.rank() as i32 - from.rank() as i32;

        let capture_square = self
            .en_passant_victim(&mover, to, en_passant)
            .or_else(|| (!self.is_empty(to)).then_some(to));

        let castle_squares = if mover.kind() == PieceKind::King && file_delta.abs() == 2 {
            let side = if file_delta > 0 {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            let rank = from.rank() as i32;
            Square::new(side.rook_file() as i32, rank)
                .zip(Square::new(side.rook_target_file() as i32, rank))
                .map(|(rook_from, rook_to)| (side, rook_from, rook_to))
        } else {
            None
        };

        let captured = capture_square.and_then(|sq| self.take(sq));

        let castle = castle_squares.and_then(|(side, rook_from, rook_to)| {
            let rook = *self.piece_at(rook_from)?;
            self.relocate(rook_from, rook_to);
            if let Some(moved) = self.piece_at_mut(rook_to) {
                moved.mark_moved();
            }
            Some(RookShift {
                side,
                rook,
                to: rook_to,
            })
        });

        self.relocate(from, to);
        if let Some(moved) = self.piece_at_mut(to) {
            moved.mark_moved();
        }

        let promotion = promotion.filter(|_| is_pawn && to.rank() == color.promotion_rank());
        if let Some(kind) = promotion {
            self.place(Piece::new(color, kind, to).moved());
        }

        let passed_over = if is_pawn && rank_delta.abs() == 2 {
            from.offset(0, color.pawn_direction())
        } else {
            None
        };

        debug_assert!(self.is_consistent());
        Some(MoveEffects {
            mover,
            to,
            captured,
            castle,
            promotion,
            passed_over,
        })
    }

    /// Reverses a move previously applied with [`make_move`](Board::make_move).
    ///
    /// Must be called on the board exactly as `make_move` left it.
    pub fn unmake_move(&mut self, effects: &MoveEffects) {
        let landed = self.take(effects.to);
        debug_assert!(
            landed.is_some_and(|p| p.color() == effects.mover.color()),
            "unmake_move: mover missing from {}",
            effects.to
        );
        if let Some(shift) = effects.castle {
            self.take(shift.to);
            self.place(shift.rook);
        }
        self.place(effects.mover);
        if let Some(captured) = effects.captured {
            self.place(captured);
        }
        debug_assert!(self.is_consistent());
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..8 {
            write!(f, "{} ", 8 - rank)?;
            for file in 0..8 {
                let c = Square::new(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', Piece::fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(")?;
        writeln!(f, "{}", self)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn standard_layout() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);
        let e1 = board.piece_at(sq("e1")).unwrap();
        assert_eq!((e1.color(), e1.kind()), (Color::White, PieceKind::King));
        let d8 = board.piece_at(sq("d8")).unwrap();
        assert_eq!((d8.color(), d8.kind()), (Color::Black, PieceKind::Queen));
        assert_eq!(board.king_square(Color::Black), Some(sq("e8")));
        assert!(board.is_empty(sq("e4")));
        assert!(board.is_consistent());
    }

    #[test]
    fn relocate_updates_position_and_returns_capture() {
        let mut board = Board::standard();
        assert_eq!(board.relocate(sq("e2"), sq("e4")), None);
        let pawn = board.piece_at(sq("e4")).unwrap();
        assert_eq!(pawn.position(), sq("e4"));
        assert!(board.is_empty(sq("e2")));

        let captured = board.relocate(sq("d8"), sq("d2")).unwrap();
        assert_eq!(captured.kind(), PieceKind::Pawn);
        assert_eq!(captured.color(), Color::White);
        assert!(board.is_consistent());
    }

    #[test]
    fn relocate_from_empty_square_is_a_no_op() {
        let mut board = Board::standard();
        let before = board.clone();
        assert_eq!(board.relocate(sq("e4"), sq("e5")), None);
        assert_eq!(board, before);
    }

    #[test]
    fn attacks_from_the_start() {
        let board = Board::standard();
        // Pawns cover the third rank, knights reach a3 and c3.
        assert!(board.is_attacked(sq("e3"), Color::White));
        assert!(board.is_attacked(sq("a3"), Color::White));
        assert!(!board.is_attacked(sq("e4"), Color::White));
        assert!(board.is_attacked(sq("f6"), Color::Black));
        assert!(!board.is_attacked(sq("e5"), Color::Black));
    }

    #[test]
    fn display_diagram() {
        let text = Board::standard().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[4], "4  . . . . . . . .");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }

    fn board_from(pieces: &[(Color, PieceKind, &str)]) -> Board {
        let mut board = Board::empty();
        for (color, kind, at) in pieces {
            board.place(Piece::new(*color, *kind, sq(at)));
        }
        board
    }

    #[test]
    fn make_and_unmake_quiet_move() {
        let mut board = Board::standard();
        let before = board.clone();
        let effects = board.make_move(sq("e2"), sq("e4"), None, None).unwrap();
        assert_eq!(effects.passed_over, Some(sq("e3")));
        assert_eq!(effects.captured, None);
        assert!(board.piece_at(sq("e4")).unwrap().has_moved());
        board.unmake_move(&effects);
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_capture_restores_off_destination() {
        let mut board = board_from(&[
            (Color::White, PieceKind::Pawn, "e5"),
            (Color::Black, PieceKind::Pawn, "d5"),
        ]);
        let before = board.clone();
        let effects = board
            .make_move(sq("e5"), sq("d6"), Some(sq("d6")), None)
            .unwrap();
        assert!(effects.is_en_passant());
        assert_eq!(effects.captured.unwrap().position(), sq("d5"));
        assert!(board.is_empty(sq("d5")));
        assert!(board.is_empty(sq("e5")));
        board.unmake_move(&effects);
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_takes_only_an_opposing_pawn() {
        // The mover's own pawn beside the target.
        let mut board = board_from(&[
            (Color::White, PieceKind::Pawn, "d2"),
            (Color::White, PieceKind::Pawn, "e2"),
        ]);
        assert_eq!(
            board.en_passant_victim(board.piece_at(sq("d2")).unwrap(), sq("e3"), Some(sq("e3"))),
            None
        );
        let effects = board
            .make_move(sq("d2"), sq("e3"), Some(sq("e3")), None)
            .unwrap();
        assert_eq!(effects.captured, None);
        assert!(board.piece_at(sq("e2")).is_some());

        // An enemy queen beside the target.
        let mut board = board_from(&[
            (Color::Black, PieceKind::Pawn, "d4"),
            (Color::White, PieceKind::Queen, "e4"),
        ]);
        let effects = board
            .make_move(sq("d4"), sq("e3"), Some(sq("e3")), None)
            .unwrap();
        assert_eq!(effects.captured, None);
        assert_eq!(board.piece_at(sq("e4")).unwrap().kind(), PieceKind::Queen);
    }

    #[test]
    fn castling_moves_the_rook_and_back() {
        let mut board = board_from(&[
            (Color::Black, PieceKind::King, "e8"),
            (Color::Black, PieceKind::Rook, "a8"),
        ]);
        let before = board.clone();
        let effects = board.make_move(sq("e8"), sq("c8"), None, None).unwrap();
        let shift = effects.castle.unwrap();
        assert_eq!(shift.side, CastleSide::Queenside);
        let rook = board.piece_at(sq("d8")).unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert!(rook.has_moved());
        assert!(board.is_empty(sq("a8")));
        board.unmake_move(&effects);
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_is_applied_only_on_the_last_rank() {
        let mut board = board_from(&[(Color::White, PieceKind::Pawn, "b7")]);
        let before = board.clone();
        let effects = board
            .make_move(sq("b7"), sq("b8"), None, Some(PieceKind::Queen))
            .unwrap();
        assert!(effects.reaches_last_rank());
        assert_eq!(board.piece_at(sq("b8")).unwrap().kind(), PieceKind::Queen);
        board.unmake_move(&effects);
        assert_eq!(board, before);

        let effects = board.make_move(sq("b7"), sq("b8"), None, None).unwrap();
        assert_eq!(effects.promotion, None);
        assert_eq!(board.piece_at(sq("b8")).unwrap().kind(), PieceKind::Pawn);
    }

    #[test]
    fn make_move_from_empty_square_changes_nothing() {
        let mut board = Board::standard();
        assert!(board.make_move(sq("e4"), sq("e5"), None, None).is_none());
        assert_eq!(board, Board::standard());
    }
}
