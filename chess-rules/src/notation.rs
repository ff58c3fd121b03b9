//! 走法记谱
//!
//! 支持两种格式:
//! - 坐标记法: `e2e4`，升变时附加小写棋子字母，如 `e7e8q`
//! - 文字描述: `White: Knight g1 → f3 (captures Pawn) +`

use crate::error::ChessError;
use crate::moves::Move;
use crate::piece::{PieceKind, Square};

/// 记谱工具
pub struct Notation;

impl Notation {
    /// 转换为坐标记法
    pub fn to_coordinate(mv: &Move) -> String {
        let mut text = format!("{}{}", mv.from, mv.to);
        if let Some(kind) = mv.promotion {
            text.push(kind.initial());
        }
        text
    }

    /// 解析坐标记法，返回 (起始格, 目标格, 升变目标)
    pub fn parse_coordinate(text: &str) -> Result<(Square, Square, Option<PieceKind>), ChessError> {
        let text = text.trim();
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(ChessError::InvalidSquare(text.to_string()));
        }

        let from: Square = text[0..2].parse()?;
        let to: Square = text[2..4].parse()?;

        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_fen_char(c) {
                Some((kind, _)) if kind.is_promotion_target() => Some(kind),
                _ => return Err(ChessError::InvalidSquare(text.to_string())),
            },
        };

        Ok((from, to, promotion))
    }

    /// 人类可读的走法描述
    ///
    /// `gives_check` 由调用方在走子后通过 `Engine::is_in_check` 得到。
    pub fn describe(mv: &Move, gives_check: bool) -> String {
        let mut text = format!(
            "{}: {} {} → {}",
            mv.side.name(),
            mv.piece.kind.name(),
            mv.from,
            mv.to
        );

        if let Some(captured) = mv.captured {
            text.push_str(&format!(" (captures {})", captured.kind.name()));
        }
        if let Some(kind) = mv.promotion {
            text.push_str(&format!(" = {}", kind.name()));
        }
        if gives_check {
            text.push_str(" +");
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, Side};

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_to_coordinate() {
        let knight = Piece::new(PieceKind::Knight, Side::White);
        let mv = Move::new(sq("g1"), sq("f3"), knight, None);
        assert_eq!(Notation::to_coordinate(&mv), "g1f3");

        let pawn = Piece::new(PieceKind::Pawn, Side::White);
        let mut mv = Move::new(sq("e7"), sq("e8"), pawn, None);
        mv.promotion = Some(PieceKind::Queen);
        assert_eq!(Notation::to_coordinate(&mv), "e7e8q");
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(
            Notation::parse_coordinate("e2e4").unwrap(),
            (sq("e2"), sq("e4"), None)
        );
        assert_eq!(
            Notation::parse_coordinate("b7b8n").unwrap(),
            (sq("b7"), sq("b8"), Some(PieceKind::Knight))
        );
        assert!(Notation::parse_coordinate("e2").is_err());
        assert!(Notation::parse_coordinate("e2e9").is_err());
        assert!(Notation::parse_coordinate("e7e8k").is_err());
    }

    #[test]
    fn test_describe() {
        let knight = Piece::new(PieceKind::Knight, Side::Black);
        let pawn = Piece::new(PieceKind::Pawn, Side::White);
        let mv = Move::new(sq("c6"), sq("d4"), knight, Some(pawn));
        assert_eq!(
            Notation::describe(&mv, true),
            "Black: Knight c6 → d4 (captures Pawn) +"
        );
    }
}
