//! AI 错误类型

use thiserror::Error;

/// AI 相关错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

pub type Result<T> = std::result::Result<T, AiError>;
