//! 对战场设置
//!
//! JSON 持久化，缺失字段取默认值；文件缺失或格式错误时退回默认设置。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_ai::Difficulty;
use serde::{Deserialize, Serialize};

/// 锦标赛回合数上限
pub const MAX_ROUNDS: u32 = 5;

/// 对战场设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// 白方难度
    pub white: Difficulty,
    /// 黑方难度
    pub black: Difficulty,
    /// 回合数（1-5）
    pub rounds: u32,
    /// 每局最多半回合数，超过按和棋处理
    pub max_plies: usize,
    /// 随机种子，未设置时每局随机
    pub seed: Option<u64>,
    /// 是否保存棋谱
    pub save_records: bool,
    /// 棋谱目录，未设置时使用系统数据目录
    pub records_dir: Option<PathBuf>,
    /// 日志级别（trace/debug/info/warn/error）
    pub log_level: String,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            white: Difficulty::Hard,
            black: Difficulty::Medium,
            rounds: 3,
            max_plies: 300,
            seed: None,
            save_records: true,
            records_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl ArenaSettings {
    /// 默认设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("chess-arena");
            path.push("settings.json");
            path
        })
    }

    /// 从默认路径加载设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("Config directory unavailable, using default settings");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// 从指定文件加载设置
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("Settings file {:?} not found, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("Invalid settings file {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Cannot read settings file {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// 保存到默认路径
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().context("Config directory unavailable")?;
        self.save_to(&path)
    }

    /// 保存到指定文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("Cannot serialize settings")?;
        fs::write(path, content).with_context(|| format!("Cannot write settings to {:?}", path))?;
        tracing::info!("Settings saved to {:?}", path);
        Ok(())
    }

    /// 实际回合数，限制在 1 到 `MAX_ROUNDS`
    pub fn effective_rounds(&self) -> u32 {
        self.rounds.clamp(1, MAX_ROUNDS)
    }

    /// 棋谱目录
    pub fn records_directory(&self) -> Result<PathBuf> {
        match &self.records_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let data_dir = dirs::data_dir().context("Data directory unavailable")?;
                Ok(data_dir.join("chess-arena").join("records"))
            }
        }
    }
}
