//! 对局状态

use serde::{Deserialize, Serialize};

use crate::piece::Side;

/// 对局状态，每步之后重新计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// 对局继续
    Playing,
    /// 将死（胜方）
    Checkmate(Side),
    /// 逼和
    Stalemate,
    /// 子力不足和棋
    DrawInsufficientMaterial,
    /// 三次重复局面和棋
    DrawRepetition,
    /// 五十回合规则和棋
    DrawFiftyMove,
    /// 一方的王不在棋盘上（胜方）
    KingCaptured(Side),
}

impl GameStatus {
    /// 对局是否已结束
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    /// 胜方（和棋或未结束时为 None）
    pub fn winner(&self) -> Option<Side> {
        match self {
            GameStatus::Checkmate(side) | GameStatus::KingCaptured(side) => Some(*side),
            _ => None,
        }
    }

    /// 是否为和棋
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawInsufficientMaterial
                | GameStatus::DrawRepetition
                | GameStatus::DrawFiftyMove
        )
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Playing => write!(f, "playing"),
            GameStatus::Checkmate(winner) => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawInsufficientMaterial => write!(f, "draw by insufficient material"),
            GameStatus::DrawRepetition => write!(f, "draw by threefold repetition"),
            GameStatus::DrawFiftyMove => write!(f, "draw by fifty-move rule"),
            GameStatus::KingCaptured(winner) => write!(f, "king captured, {} wins", winner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        assert!(!GameStatus::Playing.is_terminal());
        assert!(GameStatus::Stalemate.is_terminal());
        assert!(GameStatus::Stalemate.is_draw());
        assert_eq!(GameStatus::Checkmate(Side::Black).winner(), Some(Side::Black));
        assert_eq!(GameStatus::KingCaptured(Side::White).winner(), Some(Side::White));
        assert!(!GameStatus::KingCaptured(Side::White).is_draw());
        assert_eq!(GameStatus::DrawRepetition.winner(), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(GameStatus::Checkmate(Side::Black).to_string(), "checkmate, Black wins");
        assert_eq!(GameStatus::DrawFiftyMove.to_string(), "draw by fifty-move rule");
    }
}
