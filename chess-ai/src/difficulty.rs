//! 难度档位
//!
//! 七档难度由弱到强：noob、easy、medium、hard、expert、master、grandmaster。
//! 每档有固定的搜索深度、随机率、失误率与战略加分权重。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// 难度档位
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 入门：depth=1，40% 概率随手乱走
    Noob,
    /// 简单：depth=1
    Easy,
    /// 中等：depth=2
    #[default]
    Medium,
    /// 困难：depth=3，不再随机吃子
    Hard,
    /// 专家：depth=4，开始叠加战略加分
    Expert,
    /// 大师：depth=5
    Master,
    /// 特级大师：depth=6
    Grandmaster,
}

/// 难度参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// 搜索深度（0 为只看一步）
    pub depth: u8,
    /// 随机吃子的概率（仅 hard 以下生效）
    pub randomness: f64,
    /// 完全随机走子的概率
    pub blunder_probability: f64,
    /// 战略加分权重（仅 expert 及以上生效）
    pub strategic_weight: f64,
}

impl Difficulty {
    /// 全部档位，由弱到强
    pub fn all() -> [Difficulty; 7] {
        [
            Difficulty::Noob,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
            Difficulty::Master,
            Difficulty::Grandmaster,
        ]
    }

    /// 档位等级 1-7
    pub fn level(&self) -> u8 {
        match self {
            Difficulty::Noob => 1,
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
            Difficulty::Expert => 5,
            Difficulty::Master => 6,
            Difficulty::Grandmaster => 7,
        }
    }

    /// 小写名称
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Noob => "noob",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
            Difficulty::Grandmaster => "grandmaster",
        }
    }

    /// 该档位的固定参数
    pub fn profile(&self) -> DifficultyProfile {
        let (depth, randomness, blunder_probability, strategic_weight) = match self {
            Difficulty::Noob => (1, 0.8, 0.4, 0.1),
            Difficulty::Easy => (1, 0.6, 0.3, 0.3),
            Difficulty::Medium => (2, 0.3, 0.15, 0.6),
            Difficulty::Hard => (3, 0.15, 0.08, 0.8),
            Difficulty::Expert => (4, 0.05, 0.03, 1.0),
            Difficulty::Master => (5, 0.02, 0.01, 1.2),
            Difficulty::Grandmaster => (6, 0.01, 0.005, 1.5),
        };

        DifficultyProfile {
            depth,
            randomness,
            blunder_probability,
            strategic_weight,
        }
    }

    /// 是否会以 `randomness` 概率随机吃子
    pub fn prefers_random_captures(&self) -> bool {
        *self < Difficulty::Hard
    }

    /// 是否在搜索分数上叠加战略加分
    pub fn uses_strategic_bonus(&self) -> bool {
        *self >= Difficulty::Expert
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Difficulty::all()
            .into_iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| AiError::UnknownDifficulty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        let levels: Vec<u8> = Difficulty::all().iter().map(|d| d.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_profiles_grow_stronger() {
        let profiles: Vec<DifficultyProfile> =
            Difficulty::all().iter().map(|d| d.profile()).collect();

        for pair in profiles.windows(2) {
            assert!(pair[0].depth <= pair[1].depth);
            assert!(pair[0].randomness > pair[1].randomness);
            assert!(pair[0].blunder_probability > pair[1].blunder_probability);
            assert!(pair[0].strategic_weight < pair[1].strategic_weight);
        }

        let grandmaster = Difficulty::Grandmaster.profile();
        assert_eq!(grandmaster.depth, 6);
        assert_eq!(grandmaster.blunder_probability, 0.005);
    }

    #[test]
    fn test_tier_switches() {
        assert!(Difficulty::Medium.prefers_random_captures());
        assert!(!Difficulty::Hard.prefers_random_captures());
        assert!(!Difficulty::Hard.uses_strategic_bonus());
        assert!(Difficulty::Expert.uses_strategic_bonus());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("noob".parse::<Difficulty>().unwrap(), Difficulty::Noob);
        assert_eq!(" GrandMaster ".parse::<Difficulty>().unwrap(), Difficulty::Grandmaster);
        assert_eq!(
            "impossible".parse::<Difficulty>(),
            Err(AiError::UnknownDifficulty("impossible".to_string()))
        );

        for difficulty in Difficulty::all() {
            assert_eq!(difficulty.to_string().parse::<Difficulty>().unwrap(), difficulty);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Expert).unwrap();
        assert_eq!(json, "\"expert\"");
        let parsed: Difficulty = serde_json::from_str("\"master\"").unwrap();
        assert_eq!(parsed, Difficulty::Master);
    }
}
