//! 机器人对战场
//!
//! 通过规则引擎与 AI 引擎的公开接口驱动机器人对局:
//! - 单局会话（轮流走子、吃子统计、棋谱记录）
//! - 多回合锦标赛与记分板
//! - JSON 设置与棋谱存储

pub mod session;
pub mod settings;
pub mod storage;
pub mod tournament;

pub use session::{CaptureStats, GameSession, MoveSource, SessionOutcome};
pub use settings::ArenaSettings;
pub use storage::{RecordStore, SavedRecordInfo};
pub use tournament::{Champion, RoundSummary, Scoreboard, Tournament};
