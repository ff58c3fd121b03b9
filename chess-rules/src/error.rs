//! 错误类型定义

use thiserror::Error;

use crate::piece::Square;

/// 国际象棋规则错误
///
/// 正常对局流程（非法走法、无历史可悔、无子可动）不经过这里，
/// 而是通过 `bool` / `Option` 返回值表达。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChessError {
    /// 坐标超出棋盘
    #[error("Invalid coordinate: ({row}, {col})")]
    InvalidCoordinate { row: i32, col: i32 },

    /// 无法解析的格子名称
    #[error("Invalid square: {0:?}")]
    InvalidSquare(String),

    /// 起始格没有棋子
    #[error("No piece at {square}")]
    NoPiece { square: Square },

    /// 非法走法
    #[error("Illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,
}

/// 棋谱读写错误
#[derive(Error, Debug)]
pub enum RecordError {
    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 棋谱版本不匹配
    #[error("Record version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    /// 棋谱中的走法无法复盘
    #[error("Chess error: {0}")]
    Chess(#[from] ChessError),
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
