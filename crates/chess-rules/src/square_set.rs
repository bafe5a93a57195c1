//! Sets of squares packed into a 64-bit mask.

use chess_model::Square;
use std::fmt;

/// A set of board squares.
///
/// Bit `n` holds the square with index `n` (`rank * 8 + file`), so iteration
/// visits squares rank by rank from the top, files left to right.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SquareSet(u64);

impl SquareSet {
    /// The empty set.
    pub const EMPTY: SquareSet = SquareSet(0);

    /// Returns true if no square is in the set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of squares in the set.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if the given square is in the set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u64 << sq.index())) != 0
    }

    /// Adds the given square.
    #[inline]
    pub fn insert(&mut self, sq: Square) {
        self.0 |= 1u64 << sq.index();
    }

    /// Returns an iterator over the squares in index order.
    #[inline]
    pub fn iter(self) -> SquareSetIter {
        SquareSetIter(self.0)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        for sq in iter {
            set.insert(sq);
        }
        set
    }
}

impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the squares of a [`SquareSet`].
pub struct SquareSetIter(u64);

impl Iterator for SquareSetIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Square::from_index(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count_ones() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn insert_and_contains() {
        let mut set = SquareSet::EMPTY;
        assert!(set.is_empty());
        set.insert(sq("e4"));
        set.insert(sq("e4"));
        set.insert(sq("a8"));
        assert_eq!(set.len(), 2);
        assert!(set.contains(sq("e4")));
        assert!(!set.contains(sq("e5")));
    }

    #[test]
    fn iterates_top_rank_first() {
        let set: SquareSet = [sq("a1"), sq("h8"), sq("d4")].into_iter().collect();
        let order: Vec<Square> = set.iter().collect();
        assert_eq!(order, vec![sq("h8"), sq("d4"), sq("a1")]);
    }
}
