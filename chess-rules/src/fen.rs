//! FEN 格式解析和生成
//!
//! 只使用标准 FEN 的前两个字段：
//! `<棋子布局> <走子方>`，其余字段（易位、吃过路兵、步数）接受但忽略。
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1`

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::engine::Engine;
use crate::error::ChessError;
use crate::piece::{Piece, Side, Square};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为规则引擎（历史为空）
    pub fn parse(fen: &str) -> Result<Engine, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ChessError::InvalidFen {
                reason: "Empty FEN string".to_string(),
            });
        }

        let board = Self::parse_board(parts[0])?;

        // 解析走子方（默认白方）
        let side_to_move = match parts.get(1) {
            Some(field) => field
                .chars()
                .next()
                .and_then(Side::from_fen_char)
                .ok_or_else(|| ChessError::InvalidFen {
                    reason: format!("Invalid side to move: {}", field),
                })?,
            None => Side::White,
        };

        Ok(Engine::from_board(board, side_to_move))
    }

    /// 解析棋盘部分
    pub fn parse_board(board_str: &str) -> Result<Board, ChessError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(ChessError::InvalidFen {
                reason: format!("Expected 8 rows, got {}", rows.len()),
            });
        }

        // FEN 从第 8 横线到第 1 横线，正好对应 row 0 到 row 7
        for (row, row_str) in rows.iter().enumerate() {
            let mut col = 0usize;

            for c in row_str.chars() {
                if col >= BOARD_SIZE {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Row {} has too many columns", row),
                    });
                }

                if let Some(empty_count) = c.to_digit(10) {
                    col += empty_count as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Square::new_unchecked(row as u8, col as u8), Some(piece));
                    col += 1;
                } else {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if col != BOARD_SIZE {
                return Err(ChessError::InvalidFen {
                    reason: format!("Row {} has {} columns, expected 8", row, col),
                });
            }
        }

        Ok(board)
    }

    /// 将引擎状态转换为 FEN 字符串
    pub fn to_string(engine: &Engine) -> String {
        format!(
            "{} {} - - 0 {}",
            Self::board_to_string(engine.board()),
            engine.side_to_move().to_fen_char(),
            engine.history().len() / 2 + 1
        )
    }

    /// 将棋盘转换为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for row in 0..BOARD_SIZE as u8 {
            let mut row_str = String::new();
            let mut empty_count = 0;

            for col in 0..BOARD_SIZE as u8 {
                if let Some(piece) = board.get(Square::new_unchecked(row, col)) {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row_str.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row_str.push_str(&empty_count.to_string());
            }

            rows.push(row_str);
        }

        rows.join("/")
    }
}
