//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, SQUARE_COUNT};
use crate::piece::{Piece, PieceKind, Side, Square};

/// 后排棋子顺序（a 列到 h 列）
const BACK_RANK: [PieceKind; BOARD_SIZE] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，索引为 row * 8 + col，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for (col, kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            // 黑方（上方，row 0-1）
            board.set(Square::new_unchecked(0, col), Some(Piece::new(*kind, Side::Black)));
            board.set(Square::new_unchecked(1, col), Some(Piece::new(PieceKind::Pawn, Side::Black)));
            // 白方（下方，row 6-7）
            board.set(Square::new_unchecked(6, col), Some(Piece::new(PieceKind::Pawn, Side::White)));
            board.set(Square::new_unchecked(7, col), Some(Piece::new(*kind, Side::White)));
        }

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, square: Square) -> Option<Piece> {
        if square.is_valid() {
            self.squares[square.to_index()]
        } else {
            None
        }
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if square.is_valid() {
            self.squares[square.to_index()] = piece;
        }
    }

    /// 移动棋子（不检查规则），返回被吃掉的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 查找指定阵营的王
    pub fn find_king(&self, side: Side) -> Option<Square> {
        self.find_piece(side, PieceKind::King)
    }

    /// 按行优先顺序查找第一个指定棋子
    pub fn find_piece(&self, side: Side, kind: PieceKind) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq) == Some(Piece::new(kind, side)))
    }

    /// 获取指定阵营的所有棋子位置（行优先）
    pub fn pieces(&self, side: Side) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.side == side)
            .collect()
    }

    /// 获取所有棋子（行优先）
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        Square::all()
            .filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
            .collect()
    }

    /// 局面键：每格 `{阵营首字母}{棋子首字母}`，空格为 `--`，末尾附加走子方
    pub fn position_key(&self, side_to_move: Side) -> String {
        let mut key = String::with_capacity(SQUARE_COUNT * 2 + 1);
        for piece in &self.squares {
            match piece {
                Some(piece) => {
                    key.push(piece.side.to_fen_char());
                    key.push(piece.kind.initial());
                }
                None => key.push_str("--"),
            }
        }
        key.push(side_to_move.to_fen_char());
        key
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_SIZE as u8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..BOARD_SIZE as u8 {
                match self.get(Square::new_unchecked(row, col)) {
                    Some(piece) => write!(f, "{} ", piece.to_fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
