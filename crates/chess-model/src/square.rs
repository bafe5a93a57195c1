//! Board square representation.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a square cannot be parsed from algebraic notation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid square: '{0}'")]
pub struct SquareParseError(pub String);

/// A square on the board, addressed by file and rank.
///
/// Files run 0-7 from left to right (a-h). Ranks run 0-7 from the top of the
/// board, so rank 0 is the eighth rank in algebraic notation and White's
/// pieces start on ranks 6 and 7.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Creates a square from signed coordinates, or `None` if off the board.
    #[inline]
    pub const fn new(file: i32, rank: i32) -> Option<Self> {
        if file >= 0 && file < 8 && rank >= 0 && rank < 8 {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// Creates a square from a 0-63 index (`rank * 8 + file`).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Square {
                file: (index % 8) as u8,
                rank: (index / 8) as u8,
            })
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Some(Square {
            file: file - b'a',
            rank: b'8' - rank,
        })
    }

    /// Returns the file (0-7, left to right).
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Returns the rank (0-7, top to bottom).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Returns the index (0-63) in rank-major, file-minor order.
    #[inline]
    pub const fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// Returns the square displaced by the given file and rank deltas.
    #[inline]
    pub const fn offset(self, file_delta: i32, rank_delta: i32) -> Option<Self> {
        Square::new(self.file as i32 + file_delta, self.rank as i32 + rank_delta)
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.file) as char, (b'8' - self.rank) as char)
    }

    /// Iterates over all 64 squares, rank by rank from the top, files left to right.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| SquareParseError(s.to_string()))
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
