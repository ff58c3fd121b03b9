//! 对战场集成测试

use chess_ai::{AiEngine, Difficulty};
use chess_arena::{
    ArenaSettings, GameSession, RecordStore, SessionOutcome, Tournament,
};
use chess_rules::{PieceKind, Side};
use tempfile::TempDir;

#[test]
fn test_tournament_saves_replayable_records() {
    let temp_dir = TempDir::new().unwrap();
    let settings = ArenaSettings {
        white: Difficulty::Easy,
        black: Difficulty::Noob,
        rounds: 3,
        max_plies: 60,
        seed: Some(17),
        records_dir: Some(temp_dir.path().join("records")),
        ..ArenaSettings::default()
    };

    let store = RecordStore::from_settings(&settings).unwrap();
    let mut tournament = Tournament::from_settings(&settings);
    let champion = tournament.run(Some(&store)).unwrap();

    let scoreboard = tournament.scoreboard();
    assert_eq!(scoreboard.games_played(), 3);
    assert_eq!(champion, scoreboard.champion());

    let saved = store.list().unwrap();
    assert_eq!(saved.len(), 3);

    for round in tournament.history() {
        let record_id = round.record_id.as_ref().unwrap();
        let record = store.load(record_id).unwrap();
        assert_eq!(record.ply_count(), round.plies);
        assert_eq!(record.metadata.white_difficulty.as_deref(), Some("easy"));
        assert_eq!(record.metadata.black_difficulty.as_deref(), Some("noob"));

        // 每一步都能通过合法性校验复盘
        let engine = record.replay().unwrap();
        assert_eq!(engine.history().len(), round.plies);

        match round.outcome {
            SessionOutcome::Finished(status) => {
                assert_eq!(record.metadata.result, Some(status));
            }
            SessionOutcome::MoveLimit => {
                assert_eq!(round.plies, 60);
                assert!(record.metadata.result.is_none());
            }
        }
    }
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let play = || {
        let white = AiEngine::from_difficulty(Difficulty::Medium).with_seed(3);
        let black = AiEngine::from_difficulty(Difficulty::Noob).with_seed(4);
        let mut session = GameSession::new(Box::new(white), Box::new(black), 30);
        let outcome = session.play_to_end();
        (outcome, session.engine().clone())
    };

    let (first_outcome, first_engine) = play();
    let (second_outcome, second_engine) = play();
    assert_eq!(first_outcome, second_outcome);
    assert_eq!(first_engine, second_engine);
}

#[test]
fn test_capture_values_match_material_lost() {
    let white = AiEngine::from_difficulty(Difficulty::Easy).with_seed(8);
    let black = AiEngine::from_difficulty(Difficulty::Easy).with_seed(9);
    let mut session = GameSession::new(Box::new(white), Box::new(black), 80);
    session.play_to_end();

    // 每方吃掉的子力等于对方损失的子力（升变会增加子力，只比较非负部分）
    let board = session.engine().board();
    let initial_material = 39;
    for side in [Side::White, Side::Black] {
        let remaining: i32 = board
            .pieces(side.opponent())
            .iter()
            .filter(|(_, piece)| piece.kind != PieceKind::King)
            .map(|(_, piece)| piece.value())
            .sum();
        let captured = session.captures(side);
        assert!(captured.value >= 0);
        let by_kind: u32 = [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ]
        .iter()
        .map(|&kind| captured.count(kind))
        .sum();
        assert_eq!(by_kind, captured.pieces);
        assert!(captured.value >= initial_material - remaining);
    }
}
