//! 锦标赛
//!
//! 固定两个难度的机器人连续对战若干回合，统计胜负并决出冠军。

use std::fmt;

use anyhow::{bail, Result};
use chess_ai::{AiEngine, Difficulty, Evaluator};
use chess_rules::Side;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::session::{CaptureStats, GameSession, SessionOutcome};
use crate::settings::{ArenaSettings, MAX_ROUNDS};
use crate::storage::RecordStore;

/// 记分板
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub white_wins: u32,
    pub black_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    /// 记录一局结果
    pub fn record(&mut self, outcome: SessionOutcome) {
        match outcome.winner() {
            Some(Side::White) => self.white_wins += 1,
            Some(Side::Black) => self.black_wins += 1,
            None => self.draws += 1,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.white_wins + self.black_wins + self.draws
    }

    /// 胜场多者为冠军
    pub fn champion(&self) -> Champion {
        if self.white_wins > self.black_wins {
            Champion::Winner(Side::White)
        } else if self.black_wins > self.white_wins {
            Champion::Winner(Side::Black)
        } else {
            Champion::Tie
        }
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "White {} - {} Black ({} draws)",
            self.white_wins, self.black_wins, self.draws
        )
    }
}

/// 锦标赛冠军
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Champion {
    Winner(Side),
    Tie,
}

impl fmt::Display for Champion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Champion::Winner(side) => write!(f, "{} wins the tournament", side),
            Champion::Tie => write!(f, "tournament ends in a tie"),
        }
    }
}

/// 单回合摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// 回合号（从 1 开始）
    pub round: u32,
    pub outcome: SessionOutcome,
    /// 半回合数
    pub plies: usize,
    pub white_captures: CaptureStats,
    pub black_captures: CaptureStats,
    /// 终局时白方剩余子力（含王）
    pub white_material: i32,
    /// 终局时黑方剩余子力（含王）
    pub black_material: i32,
    /// 保存的棋谱文件名
    pub record_id: Option<String>,
}

/// 锦标赛
pub struct Tournament {
    white: Difficulty,
    black: Difficulty,
    rounds: u32,
    max_plies: usize,
    seed: Option<u64>,
    scoreboard: Scoreboard,
    history: Vec<RoundSummary>,
    white_captures: CaptureStats,
    black_captures: CaptureStats,
}

impl Tournament {
    /// 创建锦标赛，回合数限制在 1 到 `MAX_ROUNDS`
    pub fn new(white: Difficulty, black: Difficulty, rounds: u32, max_plies: usize) -> Self {
        Self {
            white,
            black,
            rounds: rounds.clamp(1, MAX_ROUNDS),
            max_plies,
            seed: None,
            scoreboard: Scoreboard::default(),
            history: Vec::new(),
            white_captures: CaptureStats::default(),
            black_captures: CaptureStats::default(),
        }
    }

    pub fn from_settings(settings: &ArenaSettings) -> Self {
        Self::new(
            settings.white,
            settings.black,
            settings.effective_rounds(),
            settings.max_plies,
        )
        .with_seed(settings.seed)
    }

    /// 固定种子，每回合每方派生独立种子
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// 下一回合的回合号
    pub fn current_round(&self) -> u32 {
        self.history.len() as u32 + 1
    }

    pub fn is_finished(&self) -> bool {
        self.history.len() as u32 >= self.rounds
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }

    pub fn champion(&self) -> Champion {
        self.scoreboard.champion()
    }

    /// 指定阵营在已完成回合中的累计吃子
    pub fn total_captures(&self, side: Side) -> CaptureStats {
        match side {
            Side::White => self.white_captures,
            Side::Black => self.black_captures,
        }
    }

    /// 进行一回合
    pub fn play_round(&mut self, store: Option<&RecordStore>) -> Result<RoundSummary> {
        if self.is_finished() {
            bail!("Tournament already finished after {} rounds", self.rounds);
        }

        let round = self.current_round();
        let white = self.bot(self.white, u64::from(round) * 2);
        let black = self.bot(self.black, u64::from(round) * 2 + 1);
        info!(
            "Round {}/{}: {} (white) vs {} (black)",
            round, self.rounds, self.white, self.black
        );

        let mut session = GameSession::new(Box::new(white), Box::new(black), self.max_plies);
        let outcome = session.play_to_end();

        let record_id = match store {
            Some(store) => Some(store.save(session.record())?),
            None => None,
        };

        let summary = RoundSummary {
            round,
            outcome,
            plies: session.ply_count(),
            white_captures: session.captures(Side::White),
            black_captures: session.captures(Side::Black),
            white_material: Evaluator::material_for(session.engine().board(), Side::White),
            black_material: Evaluator::material_for(session.engine().board(), Side::Black),
            record_id,
        };

        self.scoreboard.record(outcome);
        self.white_captures += summary.white_captures;
        self.black_captures += summary.black_captures;
        info!(
            "Round {} finished after {} half-moves: {} | {}",
            round, summary.plies, outcome, self.scoreboard
        );
        debug!(
            "Round {} captures: white {} / black {}",
            round, summary.white_captures, summary.black_captures
        );

        self.history.push(summary.clone());
        Ok(summary)
    }

    /// 进行所有剩余回合并返回冠军
    pub fn run(&mut self, store: Option<&RecordStore>) -> Result<Champion> {
        while !self.is_finished() {
            self.play_round(store)?;
        }

        let champion = self.champion();
        info!("{} ({})", champion, self.scoreboard);
        info!(
            "Total captures: white {} ({} pts) / black {} ({} pts)",
            self.white_captures,
            self.white_captures.value,
            self.black_captures,
            self.black_captures.value
        );
        Ok(champion)
    }

    fn bot(&self, difficulty: Difficulty, salt: u64) -> AiEngine {
        let bot = AiEngine::from_difficulty(difficulty);
        match self.seed {
            Some(seed) => bot.with_seed(seed.wrapping_add(salt)),
            None => bot,
        }
    }
}
