//! 棋谱存储
//!
//! 每局对局保存为一个 JSON 文件，文件名为
//! `YYYYmmdd_HHMMSS_<白方>_vs_<黑方>.json`。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_rules::{GameRecord, GameStatus};
use chrono::{DateTime, Utc};

use crate::settings::ArenaSettings;

/// 棋谱存储
pub struct RecordStore {
    records_dir: PathBuf,
}

impl RecordStore {
    /// 打开（必要时创建）存储目录
    pub fn open(records_dir: impl Into<PathBuf>) -> Result<Self> {
        let records_dir = records_dir.into();

        if !records_dir.exists() {
            fs::create_dir_all(&records_dir)
                .with_context(|| format!("Cannot create records directory {:?}", records_dir))?;
        }

        Ok(Self { records_dir })
    }

    /// 使用设置中的棋谱目录
    pub fn from_settings(settings: &ArenaSettings) -> Result<Self> {
        Self::open(settings.records_directory()?)
    }

    /// 保存棋谱，返回文件名（不含路径）
    pub fn save(&self, record: &GameRecord) -> Result<String> {
        let white = record
            .metadata
            .white_difficulty
            .as_deref()
            .unwrap_or(record.metadata.white_player.as_str());
        let black = record
            .metadata
            .black_difficulty
            .as_deref()
            .unwrap_or(record.metadata.black_player.as_str());

        let base = generate_filename(&Utc::now(), white, black);
        let filename = self.unused_name(&base);
        let filepath = self.records_dir.join(&filename);

        let json_content = record.to_json().context("Cannot serialize game record")?;
        fs::write(&filepath, json_content)
            .with_context(|| format!("Cannot write {:?}", filepath))?;

        tracing::info!("Game record saved: {}", filename);
        Ok(filename)
    }

    /// 加载棋谱
    pub fn load(&self, record_id: &str) -> Result<GameRecord> {
        let filepath = self.records_dir.join(record_id);

        if !filepath.exists() {
            anyhow::bail!("Game record not found: {}", record_id);
        }

        let content = fs::read_to_string(&filepath)
            .with_context(|| format!("Cannot read {:?}", filepath))?;

        GameRecord::from_json(&content).context("Cannot parse game record")
    }

    /// 列出所有棋谱，最新的在前
    pub fn list(&self) -> Result<Vec<SavedRecordInfo>> {
        let mut records = Vec::new();

        if !self.records_dir.exists() {
            return Ok(records);
        }

        let entries = fs::read_dir(&self.records_dir)
            .with_context(|| format!("Cannot read records directory {:?}", self.records_dir))?;

        for entry in entries {
            let entry = entry.context("Cannot read directory entry")?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            match self.load(filename) {
                Ok(record) => {
                    let saved_at = entry
                        .metadata()
                        .and_then(|m| m.modified())
                        .map(DateTime::<Utc>::from)
                        .unwrap_or_else(|_| Utc::now());

                    records.push(SavedRecordInfo {
                        record_id: filename.to_string(),
                        white_player: record.metadata.white_player,
                        black_player: record.metadata.black_player,
                        result: record.metadata.result,
                        ply_count: record.moves.len(),
                        saved_at,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable record {}: {:#}", filename, e);
                }
            }
        }

        // 文件名以时间戳开头
        records.sort_by(|a, b| b.record_id.cmp(&a.record_id));
        Ok(records)
    }

    /// 删除棋谱
    pub fn delete(&self, record_id: &str) -> Result<()> {
        let filepath = self.records_dir.join(record_id);

        if filepath.exists() {
            fs::remove_file(&filepath).with_context(|| format!("Cannot delete {:?}", filepath))?;
            tracing::info!("Game record deleted: {}", record_id);
        }

        Ok(())
    }

    /// 存储目录
    pub fn directory(&self) -> &Path {
        &self.records_dir
    }

    /// 同一秒内保存多局时追加序号
    fn unused_name(&self, base: &str) -> String {
        let stem = base.trim_end_matches(".json");
        let mut candidate = base.to_string();
        let mut index = 2;

        while self.records_dir.join(&candidate).exists() {
            candidate = format!("{}_{}.json", stem, index);
            index += 1;
        }

        candidate
    }
}

/// 已保存棋谱的摘要
#[derive(Debug, Clone)]
pub struct SavedRecordInfo {
    /// 棋谱 ID（文件名）
    pub record_id: String,
    pub white_player: String,
    pub black_player: String,
    pub result: Option<GameStatus>,
    /// 半回合数
    pub ply_count: usize,
    /// 文件修改时间
    pub saved_at: DateTime<Utc>,
}

/// 生成文件名
fn generate_filename(timestamp: &DateTime<Utc>, white: &str, black: &str) -> String {
    format!(
        "{}_{}_vs_{}.json",
        timestamp.format("%Y%m%d_%H%M%S"),
        sanitize_filename(white),
        sanitize_filename(black)
    )
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '-',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::MoveRecord;
    use tempfile::TempDir;

    fn create_test_store() -> (RecordStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::open(temp_dir.path().join("records")).unwrap();
        (store, temp_dir)
    }

    fn sample_record() -> GameRecord {
        let mut record = GameRecord::new("hard bot".to_string(), "noob bot".to_string());
        record.set_difficulties(Some("hard"), Some("noob"));
        record.add_move(MoveRecord {
            from: "e2".to_string(),
            to: "e4".to_string(),
            promotion: None,
            notation: "White: Pawn e2 → e4".to_string(),
        });
        record
    }

    #[test]
    fn test_save_and_load() {
        let (store, _temp_dir) = create_test_store();

        let record_id = store.save(&sample_record()).unwrap();
        assert!(record_id.ends_with("_hard_vs_noob.json"));

        let loaded = store.load(&record_id).unwrap();
        assert_eq!(loaded.metadata.white_player, "hard bot");
        assert_eq!(loaded.moves.len(), 1);
        assert!(store.load("missing.json").is_err());
    }

    #[test]
    fn test_same_second_saves_do_not_collide() {
        let (store, _temp_dir) = create_test_store();

        let ids: Vec<String> = (0..3).map(|_| store.save(&sample_record()).unwrap()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn test_list_skips_corrupt_files() {
        let (store, _temp_dir) = create_test_store();
        store.save(&sample_record()).unwrap();
        fs::write(store.directory().join("broken.json"), "{").unwrap();
        fs::write(store.directory().join("notes.txt"), "hello").unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ply_count, 1);
        assert_eq!(records[0].black_player, "noob bot");
    }

    #[test]
    fn test_delete() {
        let (store, _temp_dir) = create_test_store();
        let record_id = store.save(&sample_record()).unwrap();

        store.delete(&record_id).unwrap();
        assert!(store.list().unwrap().is_empty());
        // 删除不存在的文件不报错
        store.delete(&record_id).unwrap();
    }

    #[test]
    fn test_generate_filename() {
        let timestamp = DateTime::parse_from_rfc3339("2026-01-09T15:30:22Z")
            .unwrap()
            .with_timezone(&Utc);

        let filename = generate_filename(&timestamp, "expert", "grandmaster");
        assert_eq!(filename, "20260109_153022_expert_vs_grandmaster.json");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("noob"), "noob");
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename(" hard bot "), "hard-bot");
    }
}
