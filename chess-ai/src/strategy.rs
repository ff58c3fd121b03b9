//! 战略加分
//!
//! expert 及以上在搜索分数上叠加的启发式加分，白方为正、黑方为负，
//! 再乘以难度的战略权重。

use chess_rules::{Move, PieceKind};

/// 战略加分
pub struct Strategy;

/// 走到中心四格
const CENTER_CONTROL: f64 = 0.8;

/// 马、象离开底线
const DEVELOPMENT: f64 = 0.6;

/// 王横移两格（易位形态）
const KING_SHIFT: f64 = 1.5;

/// 开局反复走同类棋子
const REPEAT_PENALTY: f64 = 0.4;

/// 吃子按被吃棋子分值的比例加分
const CAPTURE_FACTOR: f64 = 0.2;

/// 开局阶段的半回合数上限
const OPENING_HALF_MOVES: usize = 10;

/// 检查重复的最近半回合数
const RECENT_WINDOW: usize = 4;

impl Strategy {
    /// 计算走法的战略加分（已带走子方符号，未乘权重）
    ///
    /// `history` 为走子前的对局历史。
    pub fn bonus(mv: &Move, history: &[Move]) -> f64 {
        let piece = mv.piece;
        let mut bonus = 0.0;

        if (3..=4).contains(&mv.to.row) && (3..=4).contains(&mv.to.col) {
            bonus += CENTER_CONTROL;
        }

        if piece.kind.is_minor() && mv.from.row == piece.side.back_row() {
            bonus += DEVELOPMENT;
        }

        if piece.kind == PieceKind::King && mv.from.col.abs_diff(mv.to.col) == 2 {
            bonus += KING_SHIFT;
        }

        if history.len() < OPENING_HALF_MOVES {
            let recent = &history[history.len().saturating_sub(RECENT_WINDOW)..];
            let same_kind = recent
                .iter()
                .filter(|h| h.piece.kind == piece.kind && h.piece.side == piece.side)
                .count();
            if same_kind > 1 {
                bonus -= REPEAT_PENALTY;
            }
        }

        if let Some(captured) = mv.captured {
            bonus += captured.value() as f64 * CAPTURE_FACTOR;
        }

        bonus * piece.side.sign()
    }
}
