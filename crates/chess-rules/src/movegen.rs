//! Pseudo-legal target generation.
//!
//! Targets are found by asking the piece's movement rule about every square
//! on the board. The result obeys movement and blocking rules but may still
//! leave the mover's king attacked; [`GameState`](crate::GameState) filters
//! those out.

use crate::{strategy, Board, SquareSet};
use chess_model::{Piece, Square};

/// Returns every square `piece` may move to by its movement pattern.
pub fn pseudo_legal_targets(piece: &Piece, board: &Board, en_passant: Option<Square>) -> SquareSet {
    Square::all()
        .filter(|&to| strategy::is_legal_pattern(piece, to, board, en_passant))
        .collect()
}
