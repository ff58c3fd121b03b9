//! 规则常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 棋盘格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 五十回合规则所需的半回合数
pub const FIFTY_MOVE_HALF_MOVES: usize = 100;

/// 判定重复局面所需的出现次数（包括当前局面）
pub const REPETITION_COUNT: usize = 3;

/// 开始检查重复局面所需的最少历史步数
pub const REPETITION_MIN_HISTORY: usize = 8;

/// 棋谱格式版本
pub const RECORD_VERSION: &str = "1.0";
