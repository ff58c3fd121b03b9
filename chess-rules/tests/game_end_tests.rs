//! 终局判定集成测试

use std::collections::HashSet;

use chess_rules::{Board, Engine, Fen, GameStatus, Piece, PieceKind, Side, Square};

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

fn play(engine: &mut Engine, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        engine
            .try_move(sq(from), sq(to), None)
            .unwrap_or_else(|e| panic!("{}{} rejected: {}", from, to, e));
    }
}

#[test]
fn test_fools_mate() {
    let mut engine = Engine::new_game();
    play(
        &mut engine,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );

    assert!(engine.is_in_check(Side::White));
    assert!(engine.legal_moves(Side::White).is_empty());
    let status = engine.check_game_end();
    assert_eq!(status, GameStatus::Checkmate(Side::Black));
    assert_eq!(status.winner(), Some(Side::Black));
    assert!(engine.is_game_over());
}

#[test]
fn test_stalemate() {
    // 白王 h1；黑王 f2，黑后 g3；白方走
    let mut engine = Fen::parse("8/8/8/8/8/6q1/5k2/7K w").unwrap();

    assert!(!engine.is_in_check(Side::White));
    assert!(engine.legal_moves(Side::White).is_empty());
    let status = engine.check_game_end();
    assert_eq!(status, GameStatus::Stalemate);
    assert!(status.is_draw());
    assert_eq!(status.winner(), None);
}

#[test]
fn test_insufficient_material_bishop() {
    let mut engine = Fen::parse("4k3/8/8/8/8/8/8/2B1K3 w").unwrap();
    assert_eq!(engine.check_game_end(), GameStatus::DrawInsufficientMaterial);
}

#[test]
fn test_king_captured_shortcut() {
    let mut board = Board::initial();
    board.set(sq("e1"), None);
    let mut engine = Engine::from_board(board, Side::White);
    assert_eq!(engine.check_game_end(), GameStatus::KingCaptured(Side::Black));

    let mut board = Board::initial();
    board.set(sq("e8"), None);
    let mut engine = Engine::from_board(board, Side::Black);
    assert_eq!(engine.check_game_end(), GameStatus::KingCaptured(Side::White));
}

#[test]
fn test_threefold_repetition_by_knight_shuffle() {
    let mut engine = Engine::new_game();
    let shuffle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];

    play(&mut engine, &shuffle);
    assert_eq!(engine.check_game_end(), GameStatus::Playing);

    play(&mut engine, &shuffle[..3]);
    assert!(!engine.is_threefold_repetition());

    play(&mut engine, &shuffle[3..]);
    assert_eq!(engine.history().len(), 8);
    assert!(engine.is_threefold_repetition());
    assert_eq!(engine.check_game_end(), GameStatus::DrawRepetition);
}

#[test]
fn test_fifty_move_rule() {
    // 双方各一王一马，既不是子力不足也不会被将死
    let mut engine = Fen::parse("1n2k3/8/8/8/8/8/8/1N2K3 w").unwrap();
    let mut seen = HashSet::new();
    seen.insert(engine.position_key());

    for ply in 0..100 {
        assert_eq!(
            engine.check_game_end(),
            GameStatus::Playing,
            "game ended early at ply {}",
            ply
        );

        let side = engine.side_to_move();
        let candidates = engine.legal_moves(side);
        let mut played = false;

        for mv in candidates.into_iter().filter(|mv| !mv.is_capture()) {
            engine.make_move(mv.from, mv.to, None);
            let fresh = !engine.is_in_check(side.opponent())
                && !seen.contains(&engine.position_key());
            if fresh {
                seen.insert(engine.position_key());
                played = true;
                break;
            }
            engine.undo_move();
        }

        assert!(played, "no quiet fresh move at ply {}", ply);
    }

    assert!(engine.is_fifty_move_rule());
    assert!(!engine.is_threefold_repetition());
    assert_eq!(engine.check_game_end(), GameStatus::DrawFiftyMove);
}

#[test]
fn test_fifty_move_rule_reset_by_pawn_move() {
    let mut engine = Fen::parse("4k3/p7/8/8/8/8/8/R3K3 w").unwrap();
    engine.make_move(sq("a1"), sq("b1"), None);
    engine.make_move(sq("a7"), sq("a6"), None);
    assert!(!engine.is_fifty_move_rule());
    assert!(engine.history().iter().any(|mv| mv.is_pawn_move()));
}

#[test]
fn test_promotion_through_engine() {
    let mut engine = Engine::from_fen("7k/P7/8/8/8/8/8/4K3 w").unwrap();

    let mv = engine
        .try_move(sq("a7"), sq("a8"), Some(PieceKind::Rook))
        .unwrap();
    assert_eq!(mv.promotion, Some(PieceKind::Rook));
    assert_eq!(
        engine.board().get(sq("a8")),
        Some(Piece::new(PieceKind::Rook, Side::White))
    );
    // 车 a8 将军
    assert!(engine.is_in_check(Side::Black));

    engine.undo_move();
    assert_eq!(
        engine.board().get(sq("a7")),
        Some(Piece::new(PieceKind::Pawn, Side::White))
    );
    assert_eq!(engine.side_to_move(), Side::White);
}

#[test]
fn test_game_over_rejects_moves() {
    let mut engine = Engine::new_game();
    play(
        &mut engine,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );
    assert!(engine.try_move(sq("a2"), sq("a3"), None).is_err());
}
