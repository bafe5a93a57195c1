//! Facts about committed moves, for move lists and history export.

use crate::{Color, PieceKind, Square};
use std::fmt;

/// Which side of the board a king castled towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Towards the h-file (O-O).
    Kingside,
    /// Towards the a-file (O-O-O).
    Queenside,
}

impl CastleSide {
    /// Returns the file the castling rook starts on.
    #[inline]
    pub const fn rook_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Returns the file the castling rook ends on.
    #[inline]
    pub const fn rook_target_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }
}

/// A committed half-move together with everything derived while making it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// 1-based half-move number within the game.
    pub ply: u32,
    pub color: Color,
    pub from: Square,
    pub to: Square,
    /// Kind of the moving piece before any promotion.
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub en_passant: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
    /// The opponent's king is attacked after the move.
    pub check: bool,
    /// The opponent is checkmated after the move.
    pub checkmate: bool,
}

impl MoveRecord {
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castle {
            Some(CastleSide::Kingside) => write!(f, "O-O")?,
            Some(CastleSide::Queenside) => write!(f, "O-O-O")?,
            None => {
                if let Some(letter) = self.piece.notation_letter() {
                    write!(f, "{}", letter)?;
                }
                let sep = if self.is_capture() { 'x' } else { '-' };
                write!(f, "{}{}{}", self.from, sep, self.to)?;
                if let Some(letter) = self.promotion.and_then(PieceKind::notation_letter) {
                    write!(f, "={}", letter)?;
                }
                if self.en_passant {
                    write!(f, " e.p.")?;
                }
            }
        }
        if self.checkmate {
            write!(f, "#")
        } else if self.check {
            write!(f, "+")
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn record(piece: PieceKind, from: &str, to: &str) -> MoveRecord {
        MoveRecord {
            ply: 1,
            color: Color::White,
            from: sq(from),
            to: sq(to),
            piece,
            captured: None,
            en_passant: false,
            castle: None,
            promotion: None,
            check: false,
            checkmate: false,
        }
    }

    #[test]
    fn display_quiet_moves() {
        assert_eq!(record(PieceKind::Pawn, "e2", "e4").to_string(), "e2-e4");
        assert_eq!(record(PieceKind::Knight, "g1", "f3").to_string(), "Ng1-f3");
    }

    #[test]
    fn display_capture_and_en_passant() {
        let mut r = record(PieceKind::Pawn, "e5", "d6");
        r.captured = Some(PieceKind::Pawn);
        r.en_passant = true;
        assert_eq!(r.to_string(), "e5xd6 e.p.");
    }

    #[test]
    fn display_castling_and_mate() {
        let mut r = record(PieceKind::King, "e1", "g1");
        r.castle = Some(CastleSide::Kingside);
        r.check = true;
        assert_eq!(r.to_string(), "O-O+");
        r.castle = Some(CastleSide::Queenside);
        r.checkmate = true;
        assert_eq!(r.to_string(), "O-O-O#");
    }

    #[test]
    fn display_promotion() {
        let mut r = record(PieceKind::Pawn, "e7", "e8");
        r.promotion = Some(PieceKind::Queen);
        r.check = true;
        assert_eq!(r.to_string(), "e7-e8=Q+");
    }

    #[test]
    fn castle_side_files() {
        assert_eq!(CastleSide::Kingside.rook_file(), 7);
        assert_eq!(CastleSide::Kingside.rook_target_file(), 5);
        assert_eq!(CastleSide::Queenside.rook_file(), 0);
        assert_eq!(CastleSide::Queenside.rook_target_file(), 3);
    }
}
