//! Move selection.
//!
//! An [`Engine`] plays one color with one of two strategies: a fixed-depth
//! minimax search with alpha-beta pruning, or a one-ply greedy pick on
//! material. Both walk candidate moves in rank-major order of origin then
//! target and keep the first move with the best score.

use crate::eval::{evaluate, material_balance, MATE_SCORE};
use chess_model::{Color, MoveResult, PieceKind, Square};
use chess_rules::{GameState, Phase, PromotionError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Search depth used when none is configured.
pub const DEFAULT_DEPTH: u8 = 3;

const INFINITY: i32 = MATE_SCORE * 2;

/// How an [`Engine`] picks its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Minimax to a fixed depth in plies, pruned with alpha-beta.
    Minimax { depth: u8 },
    /// Best material balance after one move.
    Greedy,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Minimax {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Minimax { depth } => write!(f, "minimax (depth {})", depth),
            Strategy::Greedy => write!(f, "greedy"),
        }
    }
}

/// The move an engine settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub from: Square,
    pub to: Square,
    /// Score of the move from the engine's point of view.
    pub score: i32,
    /// Positions visited while searching.
    pub nodes: u64,
}

/// Errors from [`Engine::play`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("it is not {0}'s turn")]
    NotEngineTurn(Color),

    #[error("a promotion is pending")]
    PromotionPending,

    #[error("chosen move {from}-{to} was rejected")]
    Rejected { from: Square, to: Square },

    #[error("promotion failed: {0}")]
    Promotion(#[from] PromotionError),
}

/// A computer player for one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    color: Color,
    strategy: Strategy,
    pruning: bool,
}

impl Engine {
    pub fn new(color: Color, strategy: Strategy) -> Self {
        Engine {
            color,
            strategy,
            pruning: true,
        }
    }

    /// Minimax engine searching `depth` plies; a depth of 0 searches one.
    pub fn minimax(color: Color, depth: u8) -> Self {
        Self::new(color, Strategy::Minimax { depth })
    }

    pub fn greedy(color: Color) -> Self {
        Self::new(color, Strategy::Greedy)
    }

    /// Returns a copy that searches the full tree without alpha-beta cutoffs.
    ///
    /// Chooses the same move with the same score, only slower.
    pub fn without_pruning(self) -> Self {
        Engine {
            pruning: false,
            ..self
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Picks a move for the engine's color.
    ///
    /// Returns `None` when it is not the engine's turn, a promotion is
    /// pending, or there is no legal move. The state is used for trial moves
    /// and is unchanged on return.
    pub fn choose_move(&self, state: &mut GameState) -> Option<SearchOutcome> {
        self.search(state, None)
    }

    /// Like [`choose_move`](Self::choose_move), but gives up and returns
    /// `None` once `cancel` is set. The flag is checked between sibling moves.
    pub fn choose_move_cancellable(
        &self,
        state: &mut GameState,
        cancel: &AtomicBool,
    ) -> Option<SearchOutcome> {
        self.search(state, Some(cancel))
    }

    /// Chooses a move and commits it through [`GameState::attempt_move`],
    /// promoting to a queen when asked.
    ///
    /// Returns `Ok(None)` when the engine has no legal move.
    pub fn play(&self, state: &mut GameState) -> Result<Option<SearchOutcome>, EngineError> {
        self.play_with(state, None)
    }

    /// Cancellable form of [`play`](Self::play). Nothing is committed when
    /// the search is cancelled.
    pub fn play_cancellable(
        &self,
        state: &mut GameState,
        cancel: &AtomicBool,
    ) -> Result<Option<SearchOutcome>, EngineError> {
        self.play_with(state, Some(cancel))
    }

    fn play_with(
        &self,
        state: &mut GameState,
        cancel: Option<&AtomicBool>,
    ) -> Result<Option<SearchOutcome>, EngineError> {
        if state.phase() != Phase::AwaitingMove {
            return Err(EngineError::PromotionPending);
        }
        if state.side_to_move() != self.color {
            return Err(EngineError::NotEngineTurn(self.color));
        }
        let Some(outcome) = self.search(state, cancel) else {
            return Ok(None);
        };
        match state.attempt_move(outcome.from, outcome.to) {
            MoveResult::Success => {}
            MoveResult::PromotionRequired => state.promote(outcome.to, PieceKind::Queen)?,
            MoveResult::Invalid => {
                return Err(EngineError::Rejected {
                    from: outcome.from,
                    to: outcome.to,
                })
            }
        }
        Ok(Some(outcome))
    }

    fn search(&self, state: &mut GameState, cancel: Option<&AtomicBool>) -> Option<SearchOutcome> {
        if state.phase() != Phase::AwaitingMove || state.side_to_move() != self.color {
            tracing::debug!(color = %self.color, "not the engine's turn, no search");
            return None;
        }
        let mut searcher = Searcher {
            color: self.color,
            pruning: self.pruning,
            cancel,
            nodes: 0,
            stopped: false,
        };
        let best = match self.strategy {
            Strategy::Minimax { depth } => searcher.root(state, depth.max(1)),
            Strategy::Greedy => searcher.greedy(state),
        };

        if searcher.stopped {
            tracing::warn!(
                color = %self.color,
                nodes = searcher.nodes,
                "search cancelled"
            );
            return None;
        }
        let outcome = best.map(|(from, to, score)| SearchOutcome {
            from,
            to,
            score,
            nodes: searcher.nodes,
        });
        match &outcome {
            Some(o) => tracing::debug!(
                color = %self.color,
                strategy = %self.strategy,
                from = %o.from,
                to = %o.to,
                score = o.score,
                nodes = o.nodes,
                "search finished"
            ),
            None => tracing::debug!(color = %self.color, "no legal move"),
        }
        outcome
    }
}

/// Per-search bookkeeping.
struct Searcher<'a> {
    color: Color,
    pruning: bool,
    cancel: Option<&'a AtomicBool>,
    nodes: u64,
    stopped: bool,
}

impl Searcher<'_> {
    fn check_cancel(&mut self) -> bool {
        if !self.stopped {
            self.stopped = self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));
        }
        self.stopped
    }

    /// Keeps the first move with the strictly highest child score.
    fn root(&mut self, state: &mut GameState, depth: u8) -> Option<(Square, Square, i32)> {
        let mut best: Option<(Square, Square, i32)> = None;
        let mut alpha = -INFINITY;
        for (from, to) in state.legal_moves() {
            if self.check_cancel() {
                return None;
            }
            let Some(mut child) = state.trial(from, to) else {
                continue;
            };
            self.nodes += 1;
            let score = self.minimax(&mut child, depth - 1, alpha, INFINITY, false);
            drop(child);
            if self.stopped {
                return None;
            }
            if best.map_or(true, |(_, _, top)| score > top) {
                best = Some((from, to, score));
            }
            if self.pruning {
                alpha = alpha.max(score);
            }
        }
        best
    }

    fn minimax(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        if depth == 0 {
            return evaluate(state, self.color);
        }

        let moves = state.legal_moves();
        if moves.is_empty() {
            if !state.king_in_check(state.side_to_move()) {
                return 0;
            }
            // Shallower mates sit closer to the root and keep more depth.
            let mate = MATE_SCORE + depth as i32;
            return if maximizing { -mate } else { mate };
        }

        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for (from, to) in moves {
            if self.check_cancel() {
                break;
            }
            let Some(mut child) = state.trial(from, to) else {
                continue;
            };
            self.nodes += 1;
            let score = self.minimax(&mut child, depth - 1, alpha, beta, !maximizing);
            drop(child);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if self.pruning && beta <= alpha {
                break;
            }
        }
        best
    }

    fn greedy(&mut self, state: &mut GameState) -> Option<(Square, Square, i32)> {
        let mut best: Option<(Square, Square, i32)> = None;
        for (from, to) in state.legal_moves() {
            if self.check_cancel() {
                return None;
            }
            let Some(child) = state.trial(from, to) else {
                continue;
            };
            self.nodes += 1;
            let score = material_balance(&child, self.color);
            drop(child);
            if best.map_or(true, |(_, _, top)| score > top) {
                best = Some((from, to, score));
            }
        }
        best
    }
}
