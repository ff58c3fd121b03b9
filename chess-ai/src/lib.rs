//! 国际象棋 AI 引擎
//!
//! 包含:
//! - 七档难度及其参数
//! - 棋局评估函数（子力 + 位置分）
//! - 限宽的深度搜索
//! - 高难度的战略加分
//! - 按难度的选步策略（失误、随机吃子、搜索）

mod difficulty;
mod error;
mod evaluate;
mod search;
mod strategy;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use error::{AiError, Result};
pub use evaluate::Evaluator;
pub use search::{AiConfig, AiEngine};
pub use strategy::Strategy;
