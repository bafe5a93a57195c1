//! Value types for the chess rules engine.
//!
//! This crate provides the vocabulary shared by the rules and the search:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece identity and state
//! - [`Square`] for board coordinates (rank 0 at the top)
//! - [`MoveResult`] and [`GameStatus`] for the outcome of moves and games
//! - [`MoveRecord`] for the facts of a committed move
//! - FEN parsing and serialization

mod color;
mod fen;
mod outcome;
mod piece;
mod record;
mod square;

pub use color::Color;
pub use fen::{CastlingRights, Fen, FenError};
pub use outcome::{GameStatus, MoveResult};
pub use piece::{Piece, PieceKind};
pub use record::{CastleSide, MoveRecord};
pub use square::{Square, SquareParseError};
