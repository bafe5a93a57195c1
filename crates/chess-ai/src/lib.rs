//! Computer opponents for the chess rules engine.
//!
//! This crate provides:
//! - [`eval`] - static evaluation: material, piece-square tables, center
//!   control and king safety
//! - [`Engine`] - move selection by minimax with alpha-beta pruning or by a
//!   one-ply greedy material pick
//! - [`SharedGame`] - a game shared with a background engine turn
//!
//! # Example
//!
//! ```
//! use chess_ai::Engine;
//! use chess_model::Color;
//! use chess_rules::GameState;
//!
//! let mut game = GameState::new();
//! let engine = Engine::minimax(Color::White, 2);
//! let outcome = engine.play(&mut game).unwrap().unwrap();
//! println!("{}-{} ({} nodes)", outcome.from, outcome.to, outcome.nodes);
//! assert!(!game.is_white_to_move());
//! ```

pub mod eval;
mod search;
mod session;

pub use search::{Engine, EngineError, SearchOutcome, Strategy, DEFAULT_DEPTH};
pub use session::{EngineTurn, SessionError, SharedGame};
