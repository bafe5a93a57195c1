//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, PieceKind, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("position must have exactly one {0} king")]
    KingCount(Color),
}

/// Castling availability as written in the third FEN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const fn kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub const fn queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn parse(field: &str) -> Result<Self, FenError> {
        let mut rights = CastlingRights::default();
        if field == "-" {
            return Ok(rights);
        }
        for c in field.chars() {
            let flag = match c {
                'K' => &mut rights.white_kingside,
                'Q' => &mut rights.white_queenside,
                'k' => &mut rights.black_kingside,
                'q' => &mut rights.black_queenside,
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            };
            *flag = true;
        }
        Ok(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, c)| *c)
        .collect();
        if letters.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", letters)
        }
    }
}

/// A parsed FEN record.
///
/// Placement is indexed `[rank][file]` with rank 0 being the first rank
/// listed in the FEN string (the eighth rank).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub placement: [[Option<(PieceKind, Color)>; 8]; 8],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    /// Carried through for round-tripping; no rule reads it.
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = CastlingRights::parse(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        for color in Color::BOTH {
            let kings = placement
                .iter()
                .flatten()
                .filter(|cell| **cell == Some((PieceKind::King, color)))
                .count();
            if kings != 1 {
                return Err(FenError::KingCount(color));
            }
        }

        let fen = Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        };
        if let Some(target) = fen.en_passant {
            if !fen.is_passed_over(target) {
                return Err(FenError::InvalidEnPassantSquare(parts[3].to_string()));
            }
        }
        Ok(fen)
    }

    /// Returns true if an opposing pawn could just have double-stepped over
    /// `target`: the square lies on that pawn's path and the pawn stands
    /// one step beyond it.
    fn is_passed_over(&self, target: Square) -> bool {
        let opponent = self.side_to_move.opposite();
        let dir = opponent.pawn_direction();
        let on_path = target.rank() as i32 == opponent.pawn_rank() as i32 + dir;
        on_path
            && target
                .offset(0, dir)
                .is_some_and(|sq| self.piece_at(sq) == Some((PieceKind::Pawn, opponent)))
    }

    fn parse_placement(field: &str) -> Result<[[Option<(PieceKind, Color)>; 8]; 8], FenError> {
        let rows: Vec<&str> = field.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                rows.len()
            )));
        }

        let mut placement = [[None; 8]; 8];
        for (rank, row) in rows.iter().enumerate() {
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else if let Some(piece) = PieceKind::from_fen_char(c) {
                    if file < 8 {
                        placement[rank][file] = Some(piece);
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - rank
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - rank,
                    file
                )));
            }
        }
        Ok(placement)
    }

    fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(field) {
            // Only the third and sixth ranks can be passed over by a double step.
            Some(square) if square.rank() == 2 || square.rank() == 5 => Ok(Some(square)),
            _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
        }
    }

    /// Returns the piece listed on `square`, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<(PieceKind, Color)> {
        self.placement[square.rank() as usize][square.file() as usize]
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in self.placement.iter().enumerate() {
            if rank > 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for cell in row {
                match cell {
                    Some((kind, color)) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", kind.to_fen_char(*color))?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
        }
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant
            .map(|sq| sq.to_algebraic())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            " {} {} {} {} {}",
            side, self.castling, en_passant, self.halfmove_clock, self.fullmove_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling.to_string(), "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        let e1 = Square::from_algebraic("e1").unwrap();
        assert_eq!(fen.piece_at(e1), Some((PieceKind::King, Color::White)));
        let d8 = Square::from_algebraic("d8").unwrap();
        assert_eq!(fen.piece_at(d8), Some((PieceKind::Queen, Color::Black)));
    }

    #[test]
    fn roundtrip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = Fen::parse(original).unwrap();
        assert_eq!(parsed.to_string(), original);
        assert_eq!(parsed.en_passant, Square::from_algebraic("e3"));
    }

    #[test]
    fn invalid_part_count_and_color() {
        assert!(matches!(
            Fen::parse("invalid"),
            Err(FenError::InvalidPartCount(1))
        ));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_castling_rights() {
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
    }

    #[test]
    fn partial_castling_rights() {
        let fen = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        assert!(fen.castling.kingside(Color::White));
        assert!(!fen.castling.queenside(Color::White));
        assert!(!fen.castling.kingside(Color::Black));
        assert!(fen.castling.queenside(Color::Black));
        assert_eq!(fen.castling.to_string(), "Kq");
    }

    #[test]
    fn invalid_en_passant() {
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - abc 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - x3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn en_passant_target_must_follow_an_opposing_double_step() {
        // White to move: the target is on the sixth rank behind a black pawn.
        let fen = Fen::parse("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("d6"));

        // The mover's own side of the board.
        assert_eq!(
            Fen::parse("4k3/8/8/8/8/8/3PP3/4K3 w - e3 0 1"),
            Err(FenError::InvalidEnPassantSquare("e3".to_string()))
        );
        // A queen, not a pawn, beyond the target.
        assert_eq!(
            Fen::parse("4k3/8/8/8/3pQ3/8/8/4K3 b - e3 0 1"),
            Err(FenError::InvalidEnPassantSquare("e3".to_string()))
        );
        // Nothing beyond the target.
        assert_eq!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 b - e3 0 1"),
            Err(FenError::InvalidEnPassantSquare("e3".to_string()))
        );
    }

    #[test]
    fn invalid_clocks() {
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 0 xyz"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn requires_one_king_per_side() {
        assert_eq!(
            Fen::parse("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount(Color::Black))
        );
        assert_eq!(
            Fen::parse("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(FenError::KingCount(Color::White))
        );
    }

    #[test]
    fn fen_error_display() {
        let err = FenError::InvalidPartCount(3);
        assert!(format!("{}", err).contains("3"));

        let err = FenError::InvalidEnPassantSquare("z9".to_string());
        assert!(format!("{}", err).contains("z9"));

        let err = FenError::KingCount(Color::Black);
        assert!(format!("{}", err).contains("Black"));
    }
}
