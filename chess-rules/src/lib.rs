//! 国际象棋规则引擎
//!
//! 包含:
//! - 棋子、格子、棋盘等核心数据结构
//! - 走法几何规则与合法性检查（含自身被将军检查）
//! - 执行 / 悔棋、兵升变
//! - 终局判定（王被吃、将死、逼和、子力不足、三次重复、五十回合）
//! - FEN 局面、走法记谱、JSON 棋谱

mod board;
mod constants;
mod engine;
mod error;
mod fen;
mod moves;
mod notation;
mod piece;
mod record;
mod status;

pub use board::Board;
pub use constants::*;
pub use engine::Engine;
pub use error::{ChessError, RecordError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, MoveGenerator};
pub use notation::Notation;
pub use piece::{Piece, PieceKind, Side, Square};
pub use record::{GameMetadata, GameRecord, MoveRecord};
pub use status::GameStatus;
