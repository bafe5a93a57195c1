//! Results of move attempts and game-level status.

use crate::Color;
use std::fmt;

/// Outcome of an attempt to move a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveResult {
    /// The move was committed and the turn passed to the other side.
    Success,
    /// The move was rejected; the game state is unchanged.
    Invalid,
    /// The move was applied but a pawn reached the last rank. The turn does
    /// not pass until a promotion choice is supplied.
    PromotionRequired,
}

/// Status of the game for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    InProgress,
    CheckmateWhiteWins,
    CheckmateBlackWins,
    Stalemate,
}

impl GameStatus {
    /// Status reached when `loser` has no legal move while in check.
    #[inline]
    pub const fn checkmated(loser: Color) -> Self {
        match loser {
            Color::White => GameStatus::CheckmateBlackWins,
            Color::Black => GameStatus::CheckmateWhiteWins,
        }
    }

    /// Returns true once the game can no longer continue.
    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winning color, if any.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameStatus::CheckmateWhiteWins => Some(Color::White),
            GameStatus::CheckmateBlackWins => Some(Color::Black),
            GameStatus::InProgress | GameStatus::Stalemate => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::CheckmateWhiteWins => write!(f, "checkmate, White wins"),
            GameStatus::CheckmateBlackWins => write!(f, "checkmate, Black wins"),
            GameStatus::Stalemate => write!(f, "stalemate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkmated_names_the_other_side() {
        assert_eq!(
            GameStatus::checkmated(Color::White),
            GameStatus::CheckmateBlackWins
        );
        assert_eq!(
            GameStatus::checkmated(Color::Black),
            GameStatus::CheckmateWhiteWins
        );
    }

    #[test]
    fn winner_and_is_over() {
        assert_eq!(GameStatus::InProgress.winner(), None);
        assert!(!GameStatus::InProgress.is_over());
        assert_eq!(GameStatus::Stalemate.winner(), None);
        assert!(GameStatus::Stalemate.is_over());
        assert_eq!(GameStatus::CheckmateWhiteWins.winner(), Some(Color::White));
    }
}
