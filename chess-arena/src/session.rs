//! 单局会话
//!
//! 持有一个规则引擎与双方的走子来源，负责轮流走子、复核走法、
//! 统计吃子并记录棋谱。

use std::fmt;
use std::ops::AddAssign;

use chess_ai::{AiEngine, Difficulty};
use chess_rules::{
    Engine, Fen, GameRecord, GameStatus, Move, MoveRecord, Piece, PieceKind, Side,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 走子来源（机器人或脚本）
pub trait MoveSource {
    /// 显示名称
    fn name(&self) -> String;

    /// AI 难度（非 AI 来源为 None）
    fn difficulty(&self) -> Option<Difficulty> {
        None
    }

    /// 为当前走子方给出一步棋
    fn choose_move(&mut self, engine: &mut Engine) -> Option<Move>;
}

impl MoveSource for AiEngine {
    fn name(&self) -> String {
        format!("{} bot", self.difficulty())
    }

    fn difficulty(&self) -> Option<Difficulty> {
        Some(AiEngine::difficulty(self))
    }

    fn choose_move(&mut self, engine: &mut Engine) -> Option<Move> {
        self.select_move(engine)
    }
}

/// 单方吃子统计（不含王）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureStats {
    pub pawns: u32,
    pub knights: u32,
    pub bishops: u32,
    pub rooks: u32,
    pub queens: u32,
    /// 吃掉的棋子数
    pub pieces: u32,
    /// 吃掉的子力总分
    pub value: i32,
}

impl CaptureStats {
    /// 按种类列出时的顺序
    const KINDS: [PieceKind; 5] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    pub(crate) fn record(&mut self, piece: Piece) {
        let slot = match piece.kind {
            PieceKind::Pawn => &mut self.pawns,
            PieceKind::Knight => &mut self.knights,
            PieceKind::Bishop => &mut self.bishops,
            PieceKind::Rook => &mut self.rooks,
            PieceKind::Queen => &mut self.queens,
            PieceKind::King => return,
        };
        *slot += 1;
        self.pieces += 1;
        self.value += piece.value();
    }

    /// 吃掉的某种棋子数量（王恒为 0）
    pub fn count(&self, kind: PieceKind) -> u32 {
        match kind {
            PieceKind::Pawn => self.pawns,
            PieceKind::Knight => self.knights,
            PieceKind::Bishop => self.bishops,
            PieceKind::Rook => self.rooks,
            PieceKind::Queen => self.queens,
            PieceKind::King => 0,
        }
    }
}

impl AddAssign for CaptureStats {
    fn add_assign(&mut self, other: Self) {
        self.pawns += other.pawns;
        self.knights += other.knights;
        self.bishops += other.bishops;
        self.rooks += other.rooks;
        self.queens += other.queens;
        self.pieces += other.pieces;
        self.value += other.value;
    }
}

impl fmt::Display for CaptureStats {
    /// 形如 `Pawn x3, Knight x1`，没有吃子时为 `none`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Self::KINDS
            .iter()
            .filter(|&&kind| self.count(kind) > 0)
            .map(|&kind| format!("{} x{}", kind.name(), self.count(kind)))
            .collect();

        if parts.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// 按规则结束
    Finished(GameStatus),
    /// 达到半回合上限，按和棋处理
    MoveLimit,
}

impl SessionOutcome {
    /// 胜方
    pub fn winner(&self) -> Option<Side> {
        match self {
            SessionOutcome::Finished(status) => status.winner(),
            SessionOutcome::MoveLimit => None,
        }
    }

    /// 是否为和棋
    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Finished(status) => write!(f, "{}", status),
            SessionOutcome::MoveLimit => write!(f, "draw by move limit"),
        }
    }
}

/// 单局会话
pub struct GameSession {
    engine: Engine,
    white: Box<dyn MoveSource>,
    black: Box<dyn MoveSource>,
    record: GameRecord,
    white_captures: CaptureStats,
    black_captures: CaptureStats,
    max_plies: usize,
    status: GameStatus,
}

impl GameSession {
    /// 标准初始局面开局
    pub fn new(white: Box<dyn MoveSource>, black: Box<dyn MoveSource>, max_plies: usize) -> Self {
        Self::from_engine(Engine::new_game(), white, black, max_plies)
    }

    /// 从任意局面开局
    pub fn from_engine(
        mut engine: Engine,
        white: Box<dyn MoveSource>,
        black: Box<dyn MoveSource>,
        max_plies: usize,
    ) -> Self {
        let mut record = GameRecord::from_fen(white.name(), black.name(), Fen::to_string(&engine));
        record.set_difficulties(
            white.difficulty().map(|d| d.name()),
            black.difficulty().map(|d| d.name()),
        );

        let status = engine.check_game_end();
        if status.is_terminal() {
            record.set_result(status);
        }

        Self {
            engine,
            white,
            black,
            record,
            white_captures: CaptureStats::default(),
            black_captures: CaptureStats::default(),
            max_plies,
            status,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// 已走的半回合数
    pub fn ply_count(&self) -> usize {
        self.engine.history().len()
    }

    /// 指定阵营的吃子统计
    pub fn captures(&self, side: Side) -> CaptureStats {
        match side {
            Side::White => self.white_captures,
            Side::Black => self.black_captures,
        }
    }

    /// 走一步棋
    ///
    /// 对局已结束或走子方无棋可走时返回 None。来源给出的走法不合法
    /// （或没有给出走法）时，改走第一个合法走法。
    pub fn play_turn(&mut self) -> Option<Move> {
        if self.status.is_terminal() {
            return None;
        }

        let side = self.engine.side_to_move();
        let source = match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        };
        let suggested = source.choose_move(&mut self.engine);

        let chosen = match suggested {
            Some(mv) if self.is_own_legal_move(side, &mv) => Some(mv),
            Some(mv) => {
                warn!("{} suggested illegal move {}, playing first legal move", side, mv);
                self.first_legal_move(side)
            }
            None => self.first_legal_move(side),
        };

        let Some(chosen) = chosen else {
            self.status = self.engine.check_game_end();
            self.record.set_result(self.status);
            return None;
        };

        let played = self.engine.make_move(chosen.from, chosen.to, chosen.promotion)?;
        if let Some(captured) = played.captured {
            match side {
                Side::White => self.white_captures.record(captured),
                Side::Black => self.black_captures.record(captured),
            }
        }

        let gives_check = self.engine.is_in_check(side.opponent());
        let entry = MoveRecord::from_move(&played, gives_check);
        debug!("Ply {}: {}", self.ply_count(), entry.notation);
        self.record.add_move(entry);

        self.status = self.engine.check_game_end();
        if self.status.is_terminal() {
            self.record.set_result(self.status);
        }

        Some(played)
    }

    /// 一直走到终局或达到半回合上限
    pub fn play_to_end(&mut self) -> SessionOutcome {
        while !self.status.is_terminal() {
            if self.ply_count() >= self.max_plies {
                info!("Move limit of {} half-moves reached", self.max_plies);
                return SessionOutcome::MoveLimit;
            }
            self.play_turn();
        }

        SessionOutcome::Finished(self.status)
    }

    fn is_own_legal_move(&mut self, side: Side, mv: &Move) -> bool {
        self.engine.board().get(mv.from).is_some_and(|p| p.side == side)
            && self.engine.is_legal_move(mv.from, mv.to)
    }

    fn first_legal_move(&mut self, side: Side) -> Option<Move> {
        self.engine.legal_moves(side).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use chess_rules::Square;

    /// 按脚本走子，走法不做任何校验
    struct Scripted {
        moves: VecDeque<(&'static str, &'static str)>,
    }

    impl Scripted {
        fn boxed(moves: &[(&'static str, &'static str)]) -> Box<dyn MoveSource> {
            Box::new(Self {
                moves: moves.iter().copied().collect(),
            })
        }
    }

    impl MoveSource for Scripted {
        fn name(&self) -> String {
            "script".to_string()
        }

        fn choose_move(&mut self, engine: &mut Engine) -> Option<Move> {
            let (from, to) = self.moves.pop_front()?;
            let from: Square = from.parse().ok()?;
            let to: Square = to.parse().ok()?;
            let piece = engine.board().get(from)?;
            Some(Move::new(from, to, piece, engine.board().get(to)))
        }
    }

    #[test]
    fn test_fools_mate_session() {
        let white = Scripted::boxed(&[("f2", "f3"), ("g2", "g4")]);
        let black = Scripted::boxed(&[("e7", "e5"), ("d8", "h4")]);
        let mut session = GameSession::new(white, black, 100);

        let outcome = session.play_to_end();
        assert_eq!(outcome, SessionOutcome::Finished(GameStatus::Checkmate(Side::Black)));
        assert_eq!(outcome.winner(), Some(Side::Black));
        assert_eq!(session.ply_count(), 4);
        assert_eq!(session.record().metadata.result, Some(GameStatus::Checkmate(Side::Black)));
        assert!(session.record().moves[3].notation.ends_with('+'));
        assert!(session.play_turn().is_none());
    }

    #[test]
    fn test_illegal_suggestion_falls_back() {
        // 白方试图走黑方的兵，随后试图走出非法几何
        let white = Scripted::boxed(&[("e7", "e5"), ("a1", "a5")]);
        let black = Scripted::boxed(&[("e7", "e5")]);
        let mut session = GameSession::new(white, black, 100);

        let first = session.play_turn().unwrap();
        assert_eq!((first.from, first.to), ("a2".parse().unwrap(), "a4".parse().unwrap()));
        session.play_turn().unwrap();
        let third = session.play_turn().unwrap();
        assert_eq!(third.side, Side::White);
        assert!(third.from != "a1".parse().unwrap() || third.to != "a5".parse().unwrap());
    }

    #[test]
    fn test_capture_stats() {
        let white = Scripted::boxed(&[("e2", "e4"), ("e4", "d5")]);
        let black = Scripted::boxed(&[("d7", "d5"), ("d8", "d5")]);
        let mut session = GameSession::new(white, black, 100);

        for _ in 0..4 {
            session.play_turn().unwrap();
        }
        let white = session.captures(Side::White);
        assert_eq!(white.pieces, 1);
        assert_eq!(white.value, 1);
        assert_eq!(white.count(PieceKind::Pawn), 1);
        assert_eq!(white.to_string(), "Pawn x1");
        assert_eq!(session.captures(Side::Black), white);
    }

    #[test]
    fn test_capture_stats_by_kind() {
        let mut stats = CaptureStats::default();
        assert_eq!(stats.to_string(), "none");

        stats.record(Piece::new(PieceKind::Queen, Side::Black));
        stats.record(Piece::new(PieceKind::Pawn, Side::Black));
        stats.record(Piece::new(PieceKind::Pawn, Side::Black));
        stats.record(Piece::new(PieceKind::King, Side::Black));
        assert_eq!(stats.pieces, 3);
        assert_eq!(stats.value, 11);
        assert_eq!(stats.count(PieceKind::King), 0);
        assert_eq!(stats.to_string(), "Pawn x2, Queen x1");

        let mut total = CaptureStats::default();
        total += stats;
        total += stats;
        assert_eq!(total.queens, 2);
        assert_eq!(total.pieces, 6);
        assert_eq!(total.value, 22);
    }

    #[test]
    fn test_move_limit() {
        let white = Box::new(AiEngine::from_difficulty(Difficulty::Noob).with_seed(1));
        let black = Box::new(AiEngine::from_difficulty(Difficulty::Noob).with_seed(2));
        let mut session = GameSession::new(white, black, 6);

        let outcome = session.play_to_end();
        // 六个半回合内不可能分出胜负（最快的将死需要四个半回合，但随机走子几乎不可能）
        if outcome == SessionOutcome::MoveLimit {
            assert_eq!(session.ply_count(), 6);
            assert!(outcome.is_draw());
            assert!(session.record().metadata.result.is_none());
        } else {
            assert!(session.ply_count() <= 6);
        }
        assert_eq!(session.record().metadata.white_difficulty.as_deref(), Some("noob"));
        assert_eq!(session.record().metadata.white_player, "noob bot");
    }

    #[test]
    fn test_terminal_start_position() {
        let engine = Fen::parse("8/8/8/8/8/6q1/5k2/7K w").unwrap();
        let white = Scripted::boxed(&[]);
        let black = Scripted::boxed(&[]);
        let mut session = GameSession::from_engine(engine, white, black, 10);

        assert_eq!(session.play_to_end(), SessionOutcome::Finished(GameStatus::Stalemate));
        assert_eq!(session.ply_count(), 0);
    }
}
