//! Piece representation.

use crate::{Color, Square};

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// Kinds a pawn may promote to.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Returns the FEN character for this kind with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Returns the letter used for this kind in move text (`None` for pawns).
    pub const fn notation_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }

    /// Returns true if a pawn may promote to this kind.
    #[inline]
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A piece on the board.
///
/// Color and kind never change. The position tracks the square the piece is
/// stored on, and the moved flag only ever goes from `false` to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    position: Square,
    has_moved: bool,
}

impl Piece {
    /// Creates an unmoved piece standing on `position`.
    pub const fn new(color: Color, kind: PieceKind, position: Square) -> Self {
        Piece {
            color,
            kind,
            position,
            has_moved: false,
        }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn position(&self) -> Square {
        self.position
    }

    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Records that the piece now stands on `square`.
    #[inline]
    pub fn set_position(&mut self, square: Square) {
        self.position = square;
    }

    /// Marks the piece as having moved.
    #[inline]
    pub fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    /// Returns this piece with the moved flag set.
    #[inline]
    pub const fn moved(mut self) -> Self {
        self.has_moved = true;
        self
    }

    /// Returns the FEN character for this piece.
    #[inline]
    pub const fn fen_char(&self) -> char {
        self.kind.to_fen_char(self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_to_fen() {
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::Black), 'p');
        assert_eq!(PieceKind::King.to_fen_char(Color::White), 'K');
        assert_eq!(PieceKind::Knight.to_fen_char(Color::Black), 'n');
    }

    #[test]
    fn kind_from_fen() {
        assert_eq!(
            PieceKind::from_fen_char('P'),
            Some((PieceKind::Pawn, Color::White))
        );
        assert_eq!(
            PieceKind::from_fen_char('q'),
            Some((PieceKind::Queen, Color::Black))
        );
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }

    #[test]
    fn promotion_choices() {
        assert!(PieceKind::Queen.is_promotion_choice());
        assert!(PieceKind::Knight.is_promotion_choice());
        assert!(!PieceKind::Pawn.is_promotion_choice());
        assert!(!PieceKind::King.is_promotion_choice());
        assert!(PieceKind::PROMOTIONS
            .iter()
            .all(|kind| kind.is_promotion_choice()));
    }

    #[test]
    fn moved_flag_is_monotonic() {
        let square = Square::from_algebraic("e1").unwrap();
        let mut king = Piece::new(Color::White, PieceKind::King, square);
        assert!(!king.has_moved());
        king.mark_moved();
        king.mark_moved();
        assert!(king.has_moved());
        assert_eq!(king.position(), square);
    }

    #[test]
    fn notation_letters() {
        assert_eq!(PieceKind::Pawn.notation_letter(), None);
        assert_eq!(PieceKind::Knight.notation_letter(), Some('N'));
        assert_eq!(PieceKind::King.notation_letter(), Some('K'));
    }
}
