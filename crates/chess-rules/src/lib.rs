//! Chess rules: move validation, check detection, and game state.
//!
//! This crate provides:
//! - [`Board`] - the 8x8 grid of pieces
//! - [`strategy`] - per-piece movement and attack rules
//! - [`GameState`] - turn order, en passant, castling, promotion and
//!   checkmate/stalemate detection
//! - [`Trial`] - reversible in-place moves for search
//!
//! # Example
//!
//! ```
//! use chess_model::{MoveResult, Square};
//! use chess_rules::GameState;
//!
//! let mut game = GameState::new();
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! assert_eq!(game.attempt_move(e2, e4), MoveResult::Success);
//! println!("{}", game);
//! ```

mod board;
mod game;
pub mod movegen;
mod square_set;
pub mod strategy;
mod trial;

pub use board::{Board, MoveEffects, RookShift};
pub use game::{GameState, Phase, PromotionError};
pub use square_set::{SquareSet, SquareSetIter};
pub use trial::{Trial, Undo};
