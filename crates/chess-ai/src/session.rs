//! A game shared between an interactive caller and a background engine.
//!
//! While an engine turn is in flight it owns the game: interactive moves are
//! refused with [`SessionError::Busy`] until the turn ends, and the search
//! holds the lock for its whole duration.

use crate::search::{Engine, EngineError, SearchOutcome};
use chess_model::{MoveResult, PieceKind, Square};
use chess_rules::GameState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Errors from [`SharedGame`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("an engine turn is in progress")]
    Busy,

    #[error("game state lock was poisoned by a panic")]
    Poisoned,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Promotion(#[from] chess_rules::PromotionError),
}

/// A [`GameState`] behind a single-writer lock.
#[derive(Debug, Clone, Default)]
pub struct SharedGame {
    state: Arc<Mutex<GameState>>,
    engine_turn: Arc<AtomicBool>,
}

impl SharedGame {
    pub fn new(state: GameState) -> Self {
        SharedGame {
            state: Arc::new(Mutex::new(state)),
            engine_turn: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true while an engine turn holds the game.
    pub fn is_busy(&self) -> bool {
        self.engine_turn.load(Ordering::Acquire)
    }

    /// Runs `f` on the current state, waiting for any engine turn to finish.
    pub fn read<R>(&self, f: impl FnOnce(&GameState) -> R) -> Result<R, SessionError> {
        let guard = self.state.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&guard))
    }

    /// Returns a copy of the current state, waiting for any engine turn.
    pub fn snapshot(&self) -> Result<GameState, SessionError> {
        self.read(GameState::clone)
    }

    fn try_lock(&self) -> Result<MutexGuard<'_, GameState>, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        match self.state.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(SessionError::Busy),
            Err(TryLockError::Poisoned(_)) => Err(SessionError::Poisoned),
        }
    }

    /// Attempts an interactive move, refusing while an engine turn runs.
    pub fn try_attempt_move(&self, from: Square, to: Square) -> Result<MoveResult, SessionError> {
        Ok(self.try_lock()?.attempt_move(from, to))
    }

    /// Supplies a promotion choice, refusing while an engine turn runs.
    pub fn try_promote(&self, at: Square, kind: PieceKind) -> Result<(), SessionError> {
        Ok(self.try_lock()?.promote(at, kind)?)
    }

    /// Claims the game for an engine turn.
    ///
    /// From this call until the returned [`EngineTurn`] is run or dropped,
    /// interactive moves are refused.
    pub fn begin_engine_turn(&self) -> Result<EngineTurn, SessionError> {
        self.engine_turn
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::Busy)?;
        Ok(EngineTurn {
            game: self.clone(),
        })
    }

    /// Runs `engine`'s turn on a background thread.
    pub fn spawn_engine_turn(
        &self,
        engine: Engine,
        cancel: Arc<AtomicBool>,
    ) -> Result<JoinHandle<Result<Option<SearchOutcome>, SessionError>>, SessionError> {
        let turn = self.begin_engine_turn()?;
        Ok(thread::spawn(move || turn.run(&engine, &cancel)))
    }
}

/// An engine's exclusive claim on a [`SharedGame`].
///
/// Releases the claim when dropped.
#[derive(Debug)]
pub struct EngineTurn {
    game: SharedGame,
}

impl EngineTurn {
    /// Searches and commits the engine's move, holding the lock throughout.
    ///
    /// Blocks the calling thread for the length of the search.
    pub fn run(
        self,
        engine: &Engine,
        cancel: &AtomicBool,
    ) -> Result<Option<SearchOutcome>, SessionError> {
        let mut state = self
            .game
            .state
            .lock()
            .map_err(|_| SessionError::Poisoned)?;
        Ok(engine.play_cancellable(&mut state, cancel)?)
    }
}

impl Drop for EngineTurn {
    fn drop(&mut self) {
        self.game.engine_turn.store(false, Ordering::Release);
    }
}
