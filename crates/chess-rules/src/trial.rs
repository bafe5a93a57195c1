//! Reversible trial moves for search.
//!
//! [`GameState::simulate`] applies a move in place and returns an [`Undo`]
//! that [`GameState::undo`] uses to restore the exact prior state. The
//! [`Trial`] guard pairs the two so the undo runs on every exit path,
//! including unwinding.

use crate::board::MoveEffects;
use crate::{GameState, Phase};
use chess_model::{Color, PieceKind, Square};
use std::ops::{Deref, DerefMut};

/// State needed to reverse one [`GameState::simulate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a simulated move must be undone"]
pub struct Undo {
    effects: MoveEffects,
    en_passant: Option<Square>,
    side_to_move: Color,
}

impl Undo {
    /// What the simulated move changed on the board.
    #[inline]
    pub fn effects(&self) -> &MoveEffects {
        &self.effects
    }
}

impl GameState {
    /// Applies `from` -> `to` in place without validating it.
    ///
    /// Pawns reaching their last rank become queens and the turn passes.
    /// Cached check flags, history and captured pieces are left alone; use
    /// [`king_in_check`](GameState::king_in_check) while a trial is applied.
    /// Returns `None` when `from` is empty or a promotion is pending.
    pub fn simulate(&mut self, from: Square, to: Square) -> Option<Undo> {
        if self.phase() != Phase::AwaitingMove {
            return None;
        }
        let effects = self
            .board
            .make_move(from, to, self.en_passant, Some(PieceKind::Queen))?;
        let undo = Undo {
            effects,
            en_passant: self.en_passant,
            side_to_move: self.side_to_move,
        };
        self.en_passant = effects.passed_over;
        self.side_to_move = self.side_to_move.opposite();
        Some(undo)
    }

    /// Reverses a [`simulate`](GameState::simulate). Trials must be undone
    /// in reverse order of application.
    pub fn undo(&mut self, undo: Undo) {
        self.board.unmake_move(&undo.effects);
        self.en_passant = undo.en_passant;
        self.side_to_move = undo.side_to_move;
    }

    /// Simulates `from` -> `to` and returns a guard that undoes it on drop.
    pub fn trial(&mut self, from: Square, to: Square) -> Option<Trial<'_>> {
        let undo = self.simulate(from, to)?;
        Some(Trial {
            state: self,
            undo: Some(undo),
        })
    }
}

/// A simulated move that is undone when the guard is dropped.
///
/// Dereferences to the [`GameState`] with the move applied.
pub struct Trial<'a> {
    state: &'a mut GameState,
    undo: Option<Undo>,
}

impl Trial<'_> {
    /// What the simulated move changed on the board.
    pub fn effects(&self) -> Option<&MoveEffects> {
        self.undo.as_ref().map(Undo::effects)
    }
}

impl Deref for Trial<'_> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.state
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.state
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.state.undo(undo);
        }
    }
}
