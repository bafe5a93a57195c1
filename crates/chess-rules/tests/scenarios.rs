//! End-to-end game scenarios played through `attempt_move`.

use chess_model::{Color, GameStatus, MoveResult, PieceKind, Square};
use chess_rules::GameState;

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn play(state: &mut GameState, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        assert_eq!(
            state.attempt_move(sq(from), sq(to)),
            MoveResult::Success,
            "{}-{} should be accepted in\n{}",
            from,
            to,
            state
        );
    }
}

#[test]
fn test_opening_double_step() {
    let mut game = GameState::new();
    assert_eq!(game.attempt_move_coords(4, 6, 4, 4), MoveResult::Success);
    assert!(!game.is_white_to_move());
    assert!(!game.is_white_in_check());
    assert!(!game.is_black_in_check());
    let pawn = game.piece_at_coords(4, 4).unwrap();
    assert_eq!(pawn.kind(), PieceKind::Pawn);
    assert_eq!(pawn.color(), Color::White);
    assert!(game.piece_at_coords(4, 6).is_none());
}

#[test]
fn test_queen_delivers_mate_in_the_corner() {
    let mut game = GameState::from_fen("7k/8/5K2/8/8/8/8/6Q1 w - - 0 1").unwrap();
    assert_eq!(game.game_status(), GameStatus::InProgress);
    play(&mut game, &[("g1", "g7")]);
    assert!(game.is_black_in_check());
    assert_eq!(game.game_status(), GameStatus::CheckmateWhiteWins);
    assert_eq!(game.history().last().unwrap().to_string(), "Qg1-g7#");
}

#[test]
fn test_en_passant_removes_pawn_beside_the_destination() {
    let mut game = GameState::new();
    play(
        &mut game,
        &[("h2", "h3"), ("d7", "d5"), ("h3", "h4"), ("d5", "d4"), ("e2", "e4")],
    );
    assert_eq!(game.en_passant_target(), Some(sq("e3")));
    assert!(game.legal_moves_for(sq("d4")).contains(sq("e3")));

    play(&mut game, &[("d4", "e3")]);
    assert!(game.piece_at(sq("e4")).is_none(), "captured pawn must leave e4");
    let capturer = game.piece_at(sq("e3")).unwrap();
    assert_eq!(capturer.color(), Color::Black);
    assert_eq!(game.captured().len(), 1);
    assert_eq!(game.captured()[0].position(), sq("e4"));
}

#[test]
fn test_castling_both_sides_until_the_king_moves() {
    let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
    let mut game = GameState::from_fen(fen).unwrap();
    let targets = game.legal_moves_for(sq("e1"));
    assert!(targets.contains(sq("g1")));
    assert!(targets.contains(sq("c1")));

    play(
        &mut game,
        &[("e1", "f1"), ("a7", "a6"), ("f1", "e1"), ("a6", "a5")],
    );
    let targets = game.legal_moves_for(sq("e1"));
    assert!(!targets.contains(sq("g1")));
    assert!(!targets.contains(sq("c1")));
    assert!(game.to_fen().contains(" w kq "));
}

#[test]
fn test_castling_through_an_attacked_square_is_illegal() {
    let game = GameState::from_fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1").unwrap();
    let targets = game.legal_moves_for(sq("e1"));
    assert!(!targets.contains(sq("g1")), "f1 is covered by the rook on f2");
    assert!(targets.contains(sq("c1")));
}

#[test]
fn test_castling_out_of_check_is_illegal() {
    let game = GameState::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    assert!(game.is_white_in_check());
    let targets = game.legal_moves_for(sq("e1"));
    assert!(!targets.contains(sq("g1")));
    assert!(!targets.contains(sq("c1")));
}

#[test]
fn test_stalemate() {
    let game = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(game.game_status(), GameStatus::Stalemate);
    assert!(game.legal_moves().is_empty());
}

#[test]
fn test_promotion_round_trip() {
    let mut game = GameState::from_fen("1n5k/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert_eq!(
        game.attempt_move(sq("a7"), sq("b8")),
        MoveResult::PromotionRequired
    );
    assert_eq!(game.captured().len(), 1);
    game.promote(sq("b8"), PieceKind::Queen).unwrap();
    assert!(!game.is_white_to_move());
    let record = game.history().last().unwrap();
    assert_eq!(record.captured, Some(PieceKind::Knight));
    assert_eq!(record.promotion, Some(PieceKind::Queen));
    assert_eq!(record.to_string(), "a7xb8=Q+");
    assert_eq!(game.game_status(), GameStatus::InProgress);
}

#[test]
fn test_scholars_mate() {
    let mut game = GameState::new();
    play(
        &mut game,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
            ("h5", "f7"),
        ],
    );
    assert_eq!(game.game_status(), GameStatus::CheckmateWhiteWins);
    assert_eq!(game.history().len(), 7);
    assert!(game.history().iter().rev().skip(1).all(|r| !r.checkmate));
}
