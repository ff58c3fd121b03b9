//! 搜索引擎
//!
//! 实现限宽的深度搜索与按难度的选步策略:
//! 1. 以失误率完全随机走子
//! 2. hard 以下以随机率随机吃子
//! 3. 否则深度搜索，expert 及以上叠加战略加分
//! 4. 兵到底线一律升变为后
//!
//! 所有模拟都通过规则引擎的临时走法完成，任何退出路径都会恢复棋盘与走子方。

use chess_rules::{Engine, Move, PieceKind, Side};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::evaluate::Evaluator;
use crate::strategy::Strategy;

/// 一步棋让对方被将军的加分
const CHECK_BONUS: f64 = 2.0;

/// AI 配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            profile: difficulty.profile(),
        }
    }

    /// 覆盖档位的固定参数（策略开关仍按档位）
    pub fn with_profile(mut self, profile: DifficultyProfile) -> Self {
        self.profile = profile;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
            nodes_searched: 0,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 使用固定种子（可复现）
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// 为当前走子方选择一步棋
    ///
    /// 没有合法走法时返回 None，由调用方通过 `check_game_end` 判定终局。
    /// 返回前棋盘、走子方与历史都与调用前一致。
    pub fn select_move(&mut self, engine: &mut Engine) -> Option<Move> {
        self.nodes_searched = 0;

        let side = engine.side_to_move();
        let moves = engine.legal_moves(side);
        if moves.is_empty() {
            return None;
        }

        let difficulty = self.config.difficulty;
        let profile = self.config.profile;

        let selected = if self.rng.gen::<f64>() < profile.blunder_probability {
            let mv = *moves.choose(&mut self.rng)?;
            info!("{} bot ({}) blunders with {}", side, difficulty, mv);
            mv
        } else if difficulty.prefers_random_captures() && self.rng.gen::<f64>() < profile.randomness
        {
            self.random_capture(&moves)?
        } else {
            let weight = difficulty
                .uses_strategic_bonus()
                .then_some(profile.strategic_weight);
            self.best_move(engine, &moves, profile.depth, weight)
        };

        Some(Self::with_queen_promotion(selected))
    }

    /// 随机吃子，没有可吃的子时随机走
    fn random_capture(&mut self, moves: &[Move]) -> Option<Move> {
        let captures: Vec<Move> = moves.iter().filter(|mv| mv.is_capture()).copied().collect();
        if captures.is_empty() {
            moves.choose(&mut self.rng).copied()
        } else {
            captures.choose(&mut self.rng).copied()
        }
    }

    /// 对所有候选走法做深度搜索，白方取最大、黑方取最小
    ///
    /// 分数相同时保留枚举顺序中的第一步；没有走法超过初始值时退回第一步。
    fn best_move(
        &mut self,
        engine: &mut Engine,
        moves: &[Move],
        depth: u8,
        strategic_weight: Option<f64>,
    ) -> Move {
        let maximize = engine.side_to_move() == Side::White;
        let mut best_score = if maximize {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = moves[0];

        for mv in moves {
            let mut score = self.evaluate_move_deep(engine, mv, depth);
            if let Some(weight) = strategic_weight {
                score += Strategy::bonus(mv, engine.history()) * weight;
            }

            let better = if maximize {
                score > best_score
            } else {
                score < best_score
            };
            if better {
                best_score = score;
                best_move = *mv;
            }
        }

        debug!(
            "Depth {} search picked {} (score {:.2}, {} nodes)",
            depth, best_move, best_score, self.nodes_searched
        );
        best_move
    }

    /// 一步棋的静态评估：局面分 + 吃子加分 + 将军加分（按走子方符号）
    pub fn evaluate_move(&mut self, engine: &mut Engine, mv: &Move) -> f64 {
        self.nodes_searched += 1;

        let mover = mv.side;
        let sign = mover.sign();
        let captured = engine.board().get(mv.to);

        engine.with_temporary_move(mv.from, mv.to, |engine| {
            let mut score = Evaluator::evaluate(engine.board());
            if let Some(piece) = captured {
                score += piece.value() as f64 * sign;
            }
            if engine.is_in_check(mover.opponent()) {
                score += CHECK_BONUS * sign;
            }
            score
        })
    }

    /// 深度搜索：模拟走法后取对方最佳应着的分数
    ///
    /// 对方应着按深度限宽，优先吃子和将军的走法。一个应着都没有时返回
    /// 对方视角的初始值（对白方为 -inf，对黑方为 +inf）。
    pub fn evaluate_move_deep(&mut self, engine: &mut Engine, mv: &Move, depth: u8) -> f64 {
        if depth == 0 {
            return self.evaluate_move(engine, mv);
        }
        self.nodes_searched += 1;

        engine.with_temporary_turn(mv.from, mv.to, |engine| {
            let replier = engine.side_to_move();
            let replies = engine.legal_moves(replier);
            let candidates = Self::candidate_replies(engine, replies, depth);

            let maximize = replier == Side::White;
            let mut best = if maximize {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };

            for reply in &candidates {
                let score = self.evaluate_move_deep(engine, reply, depth - 1);
                best = if maximize {
                    best.max(score)
                } else {
                    best.min(score)
                };
            }

            best
        })
    }

    /// 截取待搜索的应着：有吃子或将军的走法时只取这些，否则取前若干步
    fn candidate_replies(engine: &mut Engine, replies: Vec<Move>, depth: u8) -> Vec<Move> {
        let limit = Self::reply_width(depth);

        let priority: Vec<Move> = replies
            .iter()
            .filter(|reply| reply.is_capture() || Self::gives_check(engine, reply))
            .take(limit)
            .copied()
            .collect();

        if priority.is_empty() {
            replies.into_iter().take(limit).collect()
        } else {
            priority
        }
    }

    /// 搜索宽度随深度收紧
    fn reply_width(depth: u8) -> usize {
        match depth {
            d if d >= 3 => 2,
            2 => 4,
            _ => 6,
        }
    }

    fn gives_check(engine: &mut Engine, mv: &Move) -> bool {
        engine.with_temporary_move(mv.from, mv.to, |engine| {
            engine.is_in_check(mv.side.opponent())
        })
    }

    fn with_queen_promotion(mut mv: Move) -> Move {
        if mv.reaches_promotion_row() {
            mv.promotion = Some(PieceKind::Queen);
        }
        mv
    }

    /// 获取上一次选步搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}
