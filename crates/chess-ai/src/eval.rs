//! Static evaluation.
//!
//! Scores are in centipawns from one color's point of view: material plus a
//! piece-square bonus for every piece, a bonus for each piece on the four
//! center squares, and a penalty when that color's king is attacked.

use chess_model::{Color, Piece, PieceKind};
use chess_rules::GameState;

/// Base of the score given to a checkmate. Never reached by material alone.
pub const MATE_SCORE: i32 = 1_000_000;

/// Bonus per piece standing on d4, e4, d5 or e5.
pub const CENTER_BONUS: i32 = 10;

/// Penalty when the evaluated side's own king is attacked.
pub const CHECK_PENALTY: i32 = 50;

/// Material value of a piece kind in centipawns.
///
/// The king's value only has to dominate every other term.
pub const fn material(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

// Tables are written from White's side: the first row is the eighth rank,
// the last row White's home rank.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

const fn table(kind: PieceKind) -> &'static [i32; 64] {
    match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    }
}

/// Piece-square bonus for `piece` where it stands.
///
/// Black reads the tables with ranks mirrored.
pub fn positional(piece: &Piece) -> i32 {
    let sq = piece.position();
    let row = match piece.color() {
        Color::White => sq.rank() as usize,
        Color::Black => 7 - sq.rank() as usize,
    };
    table(piece.kind())[row * 8 + sq.file() as usize]
}

fn is_center(piece: &Piece) -> bool {
    let sq = piece.position();
    (3..=4).contains(&sq.file()) && (3..=4).contains(&sq.rank())
}

/// Full static evaluation of `state` for `perspective`.
pub fn evaluate(state: &GameState, perspective: Color) -> i32 {
    let mut score = 0;
    for piece in state.board().pieces() {
        let mut value = material(piece.kind()) + positional(piece);
        if is_center(piece) {
            value += CENTER_BONUS;
        }
        if piece.color() == perspective {
            score += value;
        } else {
            score -= value;
        }
    }
    if state.king_in_check(perspective) {
        score -= CHECK_PENALTY;
    }
    score
}

/// Material balance of `state` for `perspective`, ignoring position.
pub fn material_balance(state: &GameState, perspective: Color) -> i32 {
    state
        .board()
        .pieces()
        .map(|p| {
            let value = material(p.kind());
            if p.color() == perspective {
                value
            } else {
                -value
            }
        })
        .sum()
}
