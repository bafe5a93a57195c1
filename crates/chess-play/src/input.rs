//! Parsing of terminal input.

use chess_model::{PieceKind, Square, SquareParseError};
use chess_rules::GameState;
use std::str::FromStr;
use thiserror::Error;

/// A line typed by the human player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A move such as `e2e4`, `e2-e4`, `e2 e4` or `e7e8q`.
    Move {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
    /// List the legal targets of the piece on a square.
    Moves(Square),
    Board,
    Fen,
    History,
    Help,
    Quit,
}

/// Errors that can occur when parsing a line of input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty input")]
    Empty,

    #[error("unrecognised input '{0}', type 'help' for commands")]
    Unrecognised(String),

    #[error(transparent)]
    Square(#[from] SquareParseError),

    #[error("'{0}' is not a promotion choice, use q, r, b or n")]
    Promotion(String),

    #[error("'moves' takes exactly one square, got '{0}'")]
    MovesArgument(String),

    #[error("{from}-{to} does not promote, drop the '{kind}' suffix")]
    UnexpectedPromotion {
        from: Square,
        to: Square,
        kind: PieceKind,
    },
}

pub const HELP: &str = "\
commands:
  e2e4 | e2-e4 | e2 e4   move a piece (append q/r/b/n to choose a promotion)
  moves <square>         list legal targets of a piece
  board                  show the board
  fen                    print the position as FEN
  history                list the moves played so far
  help                   show this text
  quit                   leave the game";

impl FromStr for Command {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim().to_ascii_lowercase();
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => return Err(InputError::Empty),
            ["quit" | "exit"] => return Ok(Command::Quit),
            ["help" | "?"] => return Ok(Command::Help),
            ["board"] => return Ok(Command::Board),
            ["fen"] => return Ok(Command::Fen),
            ["history"] => return Ok(Command::History),
            ["moves", square] => return Ok(Command::Moves(square.parse()?)),
            ["moves", rest @ ..] => return Err(InputError::MovesArgument(rest.join(" "))),
            _ => {}
        }

        let compact: String = line
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if !(4..=5).contains(&compact.len()) || !compact.is_ascii() {
            return Err(InputError::Unrecognised(line));
        }
        let from = compact[0..2].parse()?;
        let to = compact[2..4].parse()?;
        let promotion = match compact.get(4..) {
            Some("") | None => None,
            Some(letter) => Some(parse_promotion(letter)?),
        };
        Ok(Command::Move {
            from,
            to,
            promotion,
        })
    }
}

/// Parses a promotion choice such as `q` or `knight`.
pub fn parse_promotion(input: &str) -> Result<PieceKind, InputError> {
    let word = input.trim().to_ascii_lowercase();
    let kind = PieceKind::PROMOTIONS.into_iter().find(|kind| {
        let letter = kind.notation_letter().map(|c| c.to_ascii_lowercase());
        word == kind.to_string().to_ascii_lowercase() || word.chars().eq(letter)
    });
    kind.ok_or(InputError::Promotion(word))
}

/// The question asked while a promotion choice is pending.
pub fn promotion_prompt() -> String {
    let letters: Vec<String> = PieceKind::PROMOTIONS
        .iter()
        .filter_map(|kind| kind.notation_letter())
        .map(|c| c.to_ascii_lowercase().to_string())
        .collect();
    format!("Promote to ({})?", letters.join("/"))
}

/// Rejects a promotion suffix on a move that cannot promote.
///
/// Only a pawn of the side to move stepping onto its last rank may carry one.
pub fn check_promotion_suffix(
    state: &GameState,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> Result<(), InputError> {
    let Some(kind) = promotion else {
        return Ok(());
    };
    let promotes = state.piece_at(from).is_some_and(|piece| {
        piece.kind() == PieceKind::Pawn && to.rank() == piece.color().promotion_rank()
    });
    if promotes {
        Ok(())
    } else {
        Err(InputError::UnexpectedPromotion { from, to, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_move_forms() {
        let expected = Command::Move {
            from: sq("e2"),
            to: sq("e4"),
            promotion: None,
        };
        for text in ["e2e4", "e2-e4", "e2 e4", "  E2E4  "] {
            assert_eq!(text.parse::<Command>(), Ok(expected), "{}", text);
        }
    }

    #[test]
    fn test_move_with_promotion() {
        assert_eq!(
            "a7a8n".parse::<Command>(),
            Ok(Command::Move {
                from: sq("a7"),
                to: sq("a8"),
                promotion: Some(PieceKind::Knight),
            })
        );
        assert_eq!(
            "a7a8k".parse::<Command>(),
            Err(InputError::Promotion("k".to_string()))
        );
    }

    #[test]
    fn test_commands() {
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("help".parse::<Command>(), Ok(Command::Help));
        assert_eq!("FEN".parse::<Command>(), Ok(Command::Fen));
        assert_eq!("moves g1".parse::<Command>(), Ok(Command::Moves(sq("g1"))));
        assert_eq!("".parse::<Command>(), Err(InputError::Empty));
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            "hello there".parse::<Command>(),
            Err(InputError::Unrecognised(_))
        ));
        assert_eq!(
            "z9e4".parse::<Command>(),
            Err(InputError::Square(SquareParseError("z9".to_string())))
        );
        assert!(matches!(
            "moves k9".parse::<Command>(),
            Err(InputError::Square(_))
        ));
        assert_eq!(
            "moves e2 e4".parse::<Command>(),
            Err(InputError::MovesArgument("e2 e4".to_string()))
        );
        assert_eq!(
            "moves".parse::<Command>(),
            Err(InputError::MovesArgument(String::new()))
        );
    }

    #[test]
    fn test_promotion_suffix_needs_a_promoting_pawn() {
        let state = GameState::new();
        let Ok(Command::Move {
            from,
            to,
            promotion,
        }) = "e2e4q".parse::<Command>()
        else {
            panic!("e2e4q should parse as a move");
        };
        assert_eq!(
            check_promotion_suffix(&state, from, to, promotion),
            Err(InputError::UnexpectedPromotion {
                from,
                to,
                kind: PieceKind::Queen,
            })
        );
        assert_eq!(check_promotion_suffix(&state, from, to, None), Ok(()));

        let state = GameState::from_fen("7k/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            check_promotion_suffix(&state, sq("a7"), sq("a8"), Some(PieceKind::Knight)),
            Ok(())
        );
    }

    #[test]
    fn test_promotion_prompt_lists_the_choices() {
        assert_eq!(promotion_prompt(), "Promote to (q/r/b/n)?");
    }

    #[test]
    fn test_promotion_words() {
        assert_eq!(parse_promotion("Q"), Ok(PieceKind::Queen));
        assert_eq!(parse_promotion(" bishop "), Ok(PieceKind::Bishop));
        assert_eq!(parse_promotion("n"), Ok(PieceKind::Knight));
        assert!(parse_promotion("king").is_err());
        assert!(parse_promotion("").is_err());
    }
}
