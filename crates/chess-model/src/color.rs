//! Player color representation.

/// Represents the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Both colors, White first.
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the rank step a pawn of this color advances by.
    ///
    /// Rank 0 is the top of the board (Black's back rank), so White pawns
    /// move towards smaller rank indices.
    #[inline]
    pub const fn pawn_direction(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Returns the back rank index for this color (7 for White, 0 for Black).
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Returns the rank index pawns of this color start on.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Returns the rank index on which pawns of this color promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        self.opposite().back_rank()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_color() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn color_index() {
        assert_eq!(Color::White.index(), 0);
        assert_eq!(Color::Black.index(), 1);
    }

    #[test]
    fn pawn_direction_points_at_promotion_rank() {
        assert_eq!(Color::White.pawn_direction(), -1);
        assert_eq!(Color::Black.pawn_direction(), 1);
        assert_eq!(Color::White.promotion_rank(), 0);
        assert_eq!(Color::Black.promotion_rank(), 7);
    }

    #[test]
    fn home_ranks() {
        assert_eq!(Color::White.back_rank(), 7);
        assert_eq!(Color::Black.back_rank(), 0);
        assert_eq!(Color::White.pawn_rank(), 6);
        assert_eq!(Color::Black.pawn_rank(), 1);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Color::White), "White");
        assert_eq!(format!("{}", Color::Black), "Black");
    }
}
