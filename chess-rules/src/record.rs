//! 棋谱记录格式
//!
//! JSON 格式的对局记录，可复盘为规则引擎

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::RECORD_VERSION;
use crate::engine::Engine;
use crate::error::RecordError;
use crate::fen::{Fen, INITIAL_FEN};
use crate::moves::Move;
use crate::notation::Notation;
use crate::piece::{PieceKind, Square};
use crate::status::GameStatus;

/// 对局元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    /// 白方名称
    pub white_player: String,
    /// 黑方名称
    pub black_player: String,
    /// 对局日期
    pub date: String,
    /// 白方 AI 难度
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_difficulty: Option<String>,
    /// 黑方 AI 难度
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_difficulty: Option<String>,
    /// 对局结果
    pub result: Option<GameStatus>,
}

/// 走法记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 起始格（如 "e2"）
    pub from: String,
    /// 目标格（如 "e4"）
    pub to: String,
    /// 升变目标
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
    /// 文字描述
    pub notation: String,
}

impl MoveRecord {
    /// 从已执行的走法创建
    pub fn from_move(mv: &Move, gives_check: bool) -> Self {
        Self {
            from: mv.from.to_string(),
            to: mv.to.to_string(),
            promotion: mv.promotion,
            notation: Notation::describe(mv, gives_check),
        }
    }

    /// 获取起始格
    pub fn from_square(&self) -> Result<Square, RecordError> {
        Ok(self.from.parse()?)
    }

    /// 获取目标格
    pub fn to_square(&self) -> Result<Square, RecordError> {
        Ok(self.to.parse()?)
    }
}

/// 完整的棋谱记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// 版本号
    pub version: String,
    /// 元数据
    pub metadata: GameMetadata,
    /// 初始局面 FEN
    pub initial_fen: String,
    /// 走法列表
    pub moves: Vec<MoveRecord>,
}

impl GameRecord {
    /// 创建新的棋谱记录（标准初始局面）
    pub fn new(white_player: String, black_player: String) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            metadata: GameMetadata {
                white_player,
                black_player,
                date: Utc::now().format("%Y-%m-%d").to_string(),
                white_difficulty: None,
                black_difficulty: None,
                result: None,
            },
            initial_fen: INITIAL_FEN.to_string(),
            moves: Vec::new(),
        }
    }

    /// 从自定义 FEN 创建
    pub fn from_fen(white_player: String, black_player: String, fen: String) -> Self {
        let mut record = Self::new(white_player, black_player);
        record.initial_fen = fen;
        record
    }

    /// 设置双方 AI 难度
    pub fn set_difficulties(&mut self, white: Option<&str>, black: Option<&str>) {
        self.metadata.white_difficulty = white.map(str::to_string);
        self.metadata.black_difficulty = black.map(str::to_string);
    }

    /// 添加走法
    pub fn add_move(&mut self, mv: MoveRecord) {
        self.moves.push(mv);
    }

    /// 设置对局结果
    pub fn set_result(&mut self, result: GameStatus) {
        self.metadata.result = Some(result);
    }

    /// 半回合数
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从 JSON 解析
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: GameRecord = serde_json::from_str(json)?;
        if record.version != RECORD_VERSION {
            return Err(RecordError::VersionMismatch {
                expected: RECORD_VERSION.to_string(),
                actual: record.version,
            });
        }
        Ok(record)
    }

    /// 从初始局面逐步复盘，每一步都经过合法性校验
    pub fn replay(&self) -> Result<Engine, RecordError> {
        let mut engine = Fen::parse(&self.initial_fen)?;
        for mv in &self.moves {
            engine.try_move(mv.from_square()?, mv.to_square()?, mv.promotion)?;
        }
        Ok(engine)
    }
}
