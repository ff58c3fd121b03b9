//! 走法定义与几何规则

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Piece, PieceKind, Side, Square};

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
    /// 走动的棋子（升变前）
    pub piece: Piece,
    /// 被吃的棋子（如果有）
    pub captured: Option<Piece>,
    /// 升变目标（如果有）
    pub promotion: Option<PieceKind>,
    /// 走子方
    pub side: Side,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            promotion: None,
            side: piece.side,
        }
    }

    /// 是否吃子
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// 是否为兵的走法
    pub fn is_pawn_move(&self) -> bool {
        self.piece.kind == PieceKind::Pawn
    }

    /// 是否会让兵到达底线
    pub fn reaches_promotion_row(&self) -> bool {
        self.is_pawn_move() && self.to.row == self.piece.side.promotion_row()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 走法几何规则
///
/// 只判断棋子本身的走法形状与路径，不考虑自身是否被将军。
pub struct MoveGenerator;

impl MoveGenerator {
    /// 检查棋子能否按几何规则从 `from` 走到 `to`
    pub fn is_valid_piece_move(board: &Board, piece: Piece, from: Square, to: Square) -> bool {
        if !from.is_valid() || !to.is_valid() || from == to {
            return false;
        }

        let d_row = to.row as i8 - from.row as i8;
        let d_col = to.col as i8 - from.col as i8;

        match piece.kind {
            PieceKind::Pawn => Self::is_valid_pawn_move(board, piece, from, to),
            PieceKind::Knight => {
                (d_row.abs() == 2 && d_col.abs() == 1) || (d_row.abs() == 1 && d_col.abs() == 2)
            }
            PieceKind::Bishop => {
                d_row.abs() == d_col.abs() && Self::is_path_clear(board, from, to)
            }
            PieceKind::Rook => (d_row == 0 || d_col == 0) && Self::is_path_clear(board, from, to),
            PieceKind::Queen => {
                (d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs())
                    && Self::is_path_clear(board, from, to)
            }
            PieceKind::King => d_row.abs().max(d_col.abs()) == 1,
        }
    }

    /// 兵的走法：直进一格、起始行直进两格、斜进一格吃子
    fn is_valid_pawn_move(board: &Board, piece: Piece, from: Square, to: Square) -> bool {
        let direction = piece.side.pawn_direction();
        let d_row = to.row as i8 - from.row as i8;
        let d_col = (to.col as i8 - from.col as i8).abs();

        if d_col == 0 {
            if d_row == direction {
                return board.get(to).is_none();
            }
            if d_row == 2 * direction && from.row == piece.side.pawn_start_row() {
                let passed = from.offset(direction, 0);
                return board.get(to).is_none() && passed.is_some_and(|sq| board.get(sq).is_none());
            }
            return false;
        }

        if d_col == 1 && d_row == direction {
            return board.get(to).is_some_and(|target| target.side != piece.side);
        }

        false
    }

    /// 检查直线或斜线路径上（不含两端）是否全部为空
    pub fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
        let step_row = (to.row as i8 - from.row as i8).signum();
        let step_col = (to.col as i8 - from.col as i8).signum();

        let mut current = from;
        while let Some(next) = current.offset(step_row, step_col) {
            if next == to {
                return true;
            }
            if board.get(next).is_some() {
                return false;
            }
            current = next;
        }
        // 不在同一直线或斜线上时，路径永远到不了目标
        false
    }

    /// 检查指定阵营是否被将军
    ///
    /// 只使用几何规则判断对方棋子能否走到王所在格，避免递归。
    /// 没有王时视为不被将军。
    pub fn is_in_check(board: &Board, side: Side) -> bool {
        let Some(king_square) = board.find_king(side) else {
            return false;
        };

        board
            .pieces(side.opponent())
            .into_iter()
            .any(|(square, piece)| Self::is_valid_piece_move(board, piece, square, king_square))
    }
}
