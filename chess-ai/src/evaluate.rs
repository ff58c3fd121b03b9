//! 棋局评估函数
//!
//! 分值为白方视角：正值对白方有利。走子方不计入符号，
//! 白方取最大、黑方取最小由调用方负责。

use chess_rules::{Board, Piece, PieceKind, Side, Square};

/// 评估器
pub struct Evaluator;

/// 中心四格 (row, col)
const CENTER_SQUARES: [(u8, u8); 4] = [(3, 3), (3, 4), (4, 3), (4, 4)];

/// 占据中心的加分
const CENTER_BONUS: f64 = 0.5;

/// 兵每前进一格的加分
const PAWN_ADVANCE_STEP: f64 = 0.1;

/// 马偏离中心每一格的扣分
const KNIGHT_CENTRALITY_STEP: f64 = 0.1;

/// 棋盘几何中心（行列相同）
const BOARD_CENTER: f64 = 3.5;

impl Evaluator {
    /// 评估棋局（子力 + 位置分）
    pub fn evaluate(board: &Board) -> f64 {
        board
            .all_pieces()
            .into_iter()
            .map(|(square, piece)| {
                let total = piece.value() as f64 + Self::positional_value(square, piece);
                total * piece.side.sign()
            })
            .sum()
    }

    /// 单个棋子的位置分
    pub fn positional_value(square: Square, piece: Piece) -> f64 {
        let row = square.row as f64;
        let col = square.col as f64;
        let mut value = 0.0;

        if CENTER_SQUARES.contains(&(square.row, square.col)) {
            value += CENTER_BONUS;
        }

        match piece.kind {
            PieceKind::Pawn => {
                // 以起始行为零点
                let advanced = match piece.side {
                    Side::White => 6.0 - row,
                    Side::Black => row - 1.0,
                };
                value += advanced * PAWN_ADVANCE_STEP;
            }
            PieceKind::Knight => {
                value -= (BOARD_CENTER - row).abs() * KNIGHT_CENTRALITY_STEP;
                value -= (BOARD_CENTER - col).abs() * KNIGHT_CENTRALITY_STEP;
            }
            _ => {}
        }

        value
    }

    /// 快速评估（仅计算子力差）
    pub fn evaluate_material(board: &Board) -> i32 {
        Self::material_for(board, Side::White) - Self::material_for(board, Side::Black)
    }

    /// 指定阵营的子力总和（含王）
    pub fn material_for(board: &Board, side: Side) -> i32 {
        board.pieces(side).iter().map(|(_, piece)| piece.value()).sum()
    }
}
