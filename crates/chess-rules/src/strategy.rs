//! Movement rules, one per piece kind.
//!
//! [`is_legal_pattern`] answers whether a piece may move to a square on the
//! current board, ignoring whether the move would leave its own king
//! attacked. [`attacks`] answers the narrower question used by check and
//! castling detection: whether the piece threatens a square.

use crate::Board;
use chess_model::{CastleSide, Color, Piece, PieceKind, Square};

/// Returns true if `piece` may move to `to` by its movement pattern.
///
/// `en_passant` is the square a pawn passed over on the previous half-move.
pub fn is_legal_pattern(
    piece: &Piece,
    to: Square,
    board: &Board,
    en_passant: Option<Square>,
) -> bool {
    if to == piece.position() {
        return false;
    }
    match piece.kind() {
        PieceKind::Pawn => pawn_move(piece, to, board, en_passant),
        PieceKind::Knight => knight_step(piece.position(), to) && lands_on_open(piece, to, board),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            slides_to(piece.kind(), piece.position(), to, board) && lands_on_open(piece, to, board)
        }
        PieceKind::King => {
            (king_step(piece.position(), to) && lands_on_open(piece, to, board))
                || castling_side(piece, to, board).is_some()
        }
    }
}

/// Returns true if `piece` attacks `target`.
///
/// The occupant of `target` is not considered, and castling never attacks.
pub fn attacks(piece: &Piece, target: Square, board: &Board) -> bool {
    let from = piece.position();
    if target == from {
        return false;
    }
    match piece.kind() {
        PieceKind::Pawn => {
            let (df, dr) = delta(from, target);
            df.abs() == 1 && dr == piece.color().pawn_direction()
        }
        PieceKind::Knight => knight_step(from, target),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            slides_to(piece.kind(), from, target, board)
        }
        PieceKind::King => king_step(from, target),
    }
}

/// Returns the castling side if moving `king` to `to` is a legal castle.
///
/// The king must be unmoved on its home square and not in check, the rook
/// unmoved on its corner, the squares between them empty, and no square the
/// king crosses or lands on attacked.
pub fn castling_side(king: &Piece, to: Square, board: &Board) -> Option<CastleSide> {
    let from = king.position();
    let color = king.color();
    if king.kind() != PieceKind::King
        || king.has_moved()
        || from.rank() != color.back_rank()
        || from.file() != 4
        || to.rank() != from.rank()
    {
        return None;
    }
    let side = match to.file() {
        6 => CastleSide::Kingside,
        2 => CastleSide::Queenside,
        _ => return None,
    };

    let rank = from.rank() as i32;
    let rook_square = Square::new(side.rook_file() as i32, rank)?;
    let rook_ready = board.piece_at(rook_square).is_some_and(|rook| {
        rook.kind() == PieceKind::Rook && rook.color() == color && !rook.has_moved()
    });
    if !rook_ready {
        return None;
    }

    let (low, high) = if side.rook_file() < from.file() {
        (side.rook_file() + 1, from.file())
    } else {
        (from.file() + 1, side.rook_file())
    };
    let path_empty = (low..high)
        .filter_map(|file| Square::new(file as i32, rank))
        .all(|sq| board.is_empty(sq));
    if !path_empty {
        return None;
    }

    let enemy = color.opposite();
    if board.is_attacked(from, enemy) {
        return None;
    }
    let step = if to.file() > from.file() { 1 } else { -1 };
    let crossed_safe = [1, 2]
        .iter()
        .filter_map(|n| from.offset(step * n, 0))
        .all(|sq| !board.is_attacked(sq, enemy));

    crossed_safe.then_some(side)
}

fn pawn_move(pawn: &Piece, to: Square, board: &Board, en_passant: Option<Square>) -> bool {
    let from = pawn.position();
    let dir = pawn.color().pawn_direction();
    let (df, dr) = delta(from, to);

    if df == 0 {
        if dr == dir {
            return board.is_empty(to);
        }
        if dr == 2 * dir {
            let unmoved = !pawn.has_moved() && from.rank() == pawn.color().pawn_rank();
            return unmoved
                && board.is_empty(to)
                && from.offset(0, dir).is_some_and(|mid| board.is_empty(mid));
        }
        return false;
    }

    if df.abs() == 1 && dr == dir {
        let captures_enemy = board
            .color_at(to)
            .is_some_and(|color| color != pawn.color());
        return captures_enemy || board.en_passant_victim(pawn, to, en_passant).is_some();
    }

    false
}

fn knight_step(from: Square, to: Square) -> bool {
    let (df, dr) = delta(from, to);
    matches!((df.abs(), dr.abs()), (1, 2) | (2, 1))
}

fn king_step(from: Square, to: Square) -> bool {
    let (df, dr) = delta(from, to);
    df.abs() <= 1 && dr.abs() <= 1 && (df, dr) != (0, 0)
}

/// Line constraint of a slider plus an empty path strictly between the endpoints.
fn slides_to(kind: PieceKind, from: Square, to: Square, board: &Board) -> bool {
    let (df, dr) = delta(from, to);
    let straight = df == 0 || dr == 0;
    let diagonal = df.abs() == dr.abs();
    let on_line = match kind {
        PieceKind::Bishop => diagonal,
        PieceKind::Rook => straight,
        PieceKind::Queen => straight || diagonal,
        _ => false,
    };
    on_line && path_clear(from, to, board)
}

/// Returns true if every square strictly between `from` and `to` is empty.
///
/// `from` and `to` must share a rank, file or diagonal.
fn path_clear(from: Square, to: Square, board: &Board) -> bool {
    let (df, dr) = delta(from, to);
    let (step_f, step_r) = (df.signum(), dr.signum());
    let mut current = from.offset(step_f, step_r);
    while let Some(sq) = current {
        if sq == to {
            return true;
        }
        if !board.is_empty(sq) {
            return false;
        }
        current = sq.offset(step_f, step_r);
    }
    true
}

fn lands_on_open(piece: &Piece, to: Square, board: &Board) -> bool {
    board.color_at(to) != Some(piece.color())
}

#[inline]
fn delta(from: Square, to: Square) -> (i32, i32) {
    (
        to.file() as i32 - from.file() as i32,
        to.rank() as i32 - from.rank() as i32,
    )
}

/// Home square of the king of `color`.
pub(crate) fn king_home(color: Color) -> Option<Square> {
    Square::new(4, color.back_rank() as i32)
}
