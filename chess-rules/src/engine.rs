//! 规则引擎
//!
//! 持有唯一的可变棋盘、走子方与走法历史，负责:
//! - 合法性检查（含自身被将军检查）
//! - 执行 / 悔棋（含兵升变）
//! - 终局判定（王被吃、将死、逼和、三种和棋规则）

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::constants::{FIFTY_MOVE_HALF_MOVES, REPETITION_COUNT, REPETITION_MIN_HISTORY};
use crate::error::{ChessError, Result};
use crate::fen::Fen;
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Piece, PieceKind, Side, Square};
use crate::status::GameStatus;

/// 规则引擎（一局对局一个实例）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    board: Board,
    side_to_move: Side,
    history: Vec<Move>,
}

impl Engine {
    /// 标准初始局面，白方先走
    pub fn new_game() -> Self {
        Self::from_board(Board::initial(), Side::White)
    }

    /// 从任意棋盘创建（历史为空）
    pub fn from_board(board: Board, side_to_move: Side) -> Self {
        Self {
            board,
            side_to_move,
            history: Vec::new(),
        }
    }

    /// 从 FEN 字符串创建
    pub fn from_fen(fen: &str) -> Result<Self> {
        Fen::parse(fen)
    }

    /// 当前棋盘
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 当前走子方
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// 走法历史（最早的在前）
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// 最近一步
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// 当前局面键（用于重复局面判定）
    pub fn position_key(&self) -> String {
        self.board.position_key(self.side_to_move)
    }

    /// 检查走法是否合法
    ///
    /// 越界坐标、空起始格一律返回 false，不报错。
    pub fn is_legal_move(&mut self, from: Square, to: Square) -> bool {
        if !from.is_valid() || !to.is_valid() {
            return false;
        }

        let Some(piece) = self.board.get(from) else {
            return false;
        };
        let target = self.board.get(to);

        // 不能吃己方棋子
        if target.is_some_and(|t| t.side == piece.side) {
            return false;
        }

        // 王不能直接吃对方的王
        if piece.kind == PieceKind::King && target.is_some_and(|t| t.kind == PieceKind::King) {
            return false;
        }

        if !MoveGenerator::is_valid_piece_move(&self.board, piece, from, to) {
            return false;
        }

        // 模拟走法，不能让己方的王处于被将军状态
        !self.with_temporary_move(from, to, |engine| engine.is_in_check(piece.side))
    }

    /// 生成指定阵营的所有合法走法
    ///
    /// 顺序为起始格行优先、目标格行优先。
    pub fn legal_moves(&mut self, side: Side) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);

        for (from, piece) in self.board.pieces(side) {
            for to in Square::all() {
                if self.is_legal_move(from, to) {
                    moves.push(Move::new(from, to, piece, self.board.get(to)));
                }
            }
        }

        moves
    }

    /// 指定阵营是否被将军
    pub fn is_in_check(&self, side: Side) -> bool {
        MoveGenerator::is_in_check(&self.board, side)
    }

    /// 执行走法（不检查合法性，调用方需先调用 `is_legal_move`）
    ///
    /// 兵到达底线时升变为 `promotion`（默认后）。起始格为空或坐标越界时
    /// 不做任何修改并返回 None。
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Option<Move> {
        if !to.is_valid() {
            return None;
        }
        let piece = self.board.get(from)?;
        let captured = self.board.get(to);

        let mut mv = Move {
            from,
            to,
            piece,
            captured,
            promotion: None,
            side: self.side_to_move,
        };

        let placed = if piece.kind == PieceKind::Pawn && to.row == piece.side.promotion_row() {
            let kind = match promotion {
                Some(kind) if kind.is_promotion_target() => kind,
                Some(kind) => {
                    warn!("Invalid promotion choice {:?}, promoting to queen", kind);
                    PieceKind::Queen
                }
                None => PieceKind::Queen,
            };
            mv.promotion = Some(kind);
            Piece::new(kind, piece.side)
        } else {
            piece
        };

        self.board.set(from, None);
        self.board.set(to, Some(placed));
        self.history.push(mv);
        self.side_to_move = self.side_to_move.opponent();

        debug!("{} played {} ({})", mv.side, mv, piece.kind.name());
        Some(mv)
    }

    /// 校验后执行走法
    pub fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move> {
        if self.check_game_end().is_terminal() {
            return Err(ChessError::GameOver);
        }

        let piece = self
            .board
            .get(from)
            .ok_or(ChessError::NoPiece { square: from })?;

        if piece.side != self.side_to_move || !self.is_legal_move(from, to) {
            return Err(ChessError::IllegalMove { from, to });
        }

        self.make_move(from, to, promotion)
            .ok_or(ChessError::IllegalMove { from, to })
    }

    /// 悔棋一步，历史为空时返回 None
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;

        // 恢复升变前的棋子
        self.board.set(mv.from, Some(mv.piece));
        self.board.set(mv.to, mv.captured);
        self.side_to_move = self.side_to_move.opponent();

        Some(mv)
    }

    /// 在棋盘上临时执行走法并运行 `f`，返回前恢复棋盘
    ///
    /// 不修改走子方和历史；`f` 中发生 panic 时同样会恢复。
    pub fn with_temporary_move<R>(
        &mut self,
        from: Square,
        to: Square,
        f: impl FnOnce(&mut Engine) -> R,
    ) -> R {
        let mut guard = TemporaryMove::apply(self, from, to, false);
        f(&mut guard)
    }

    /// 同 `with_temporary_move`，但同时把走子方切换给对方
    pub fn with_temporary_turn<R>(
        &mut self,
        from: Square,
        to: Square,
        f: impl FnOnce(&mut Engine) -> R,
    ) -> R {
        let mut guard = TemporaryMove::apply(self, from, to, true);
        f(&mut guard)
    }

    /// 终局判定
    ///
    /// 优先级：王被吃 > 将死/逼和 > 子力不足 > 三次重复 > 五十回合。
    pub fn check_game_end(&mut self) -> GameStatus {
        let status = self.classify();
        if status.is_terminal() {
            info!("Game over after {} half-moves: {}", self.history.len(), status);
        }
        status
    }

    /// 对局是否已结束
    pub fn is_game_over(&mut self) -> bool {
        self.check_game_end().is_terminal()
    }

    fn classify(&mut self) -> GameStatus {
        if self.board.find_king(Side::White).is_none() {
            return GameStatus::KingCaptured(Side::Black);
        }
        if self.board.find_king(Side::Black).is_none() {
            return GameStatus::KingCaptured(Side::White);
        }

        let side = self.side_to_move;
        if self.legal_moves(side).is_empty() {
            return if self.is_in_check(side) {
                GameStatus::Checkmate(side.opponent())
            } else {
                GameStatus::Stalemate
            };
        }

        if self.is_insufficient_material() {
            return GameStatus::DrawInsufficientMaterial;
        }
        if self.is_threefold_repetition() {
            return GameStatus::DrawRepetition;
        }
        if self.is_fifty_move_rule() {
            return GameStatus::DrawFiftyMove;
        }

        GameStatus::Playing
    }

    /// 子力不足：王对王、王+轻子对王、同色格单象对单象
    pub fn is_insufficient_material(&self) -> bool {
        let non_kings = |side: Side| -> Vec<(Square, Piece)> {
            self.board
                .pieces(side)
                .into_iter()
                .filter(|(_, piece)| piece.kind != PieceKind::King)
                .collect()
        };
        let white = non_kings(Side::White);
        let black = non_kings(Side::Black);

        match (white.as_slice(), black.as_slice()) {
            ([], []) => true,
            ([(_, piece)], []) | ([], [(_, piece)]) => piece.kind.is_minor(),
            ([(white_sq, white_piece)], [(black_sq, black_piece)]) => {
                white_piece.kind == PieceKind::Bishop
                    && black_piece.kind == PieceKind::Bishop
                    && white_sq.is_light() == black_sq.is_light()
            }
            _ => false,
        }
    }

    /// 三次重复局面
    ///
    /// 在副本上逐步悔棋，比较同一走子方的历史局面键，不触碰当前棋盘。
    pub fn is_threefold_repetition(&self) -> bool {
        if self.history.len() < REPETITION_MIN_HISTORY {
            return false;
        }

        let current = self.position_key();
        let mut scratch = self.clone();
        let mut repetitions = 1;
        let mut undone = 0;

        while scratch.undo_move().is_some() {
            undone += 1;
            if undone < 4 || undone % 2 != 0 {
                continue;
            }
            if scratch.position_key() == current {
                repetitions += 1;
                if repetitions >= REPETITION_COUNT {
                    return true;
                }
            }
        }

        false
    }

    /// 五十回合规则：最近 100 个半回合内没有兵的走法也没有吃子
    pub fn is_fifty_move_rule(&self) -> bool {
        if self.history.len() < FIFTY_MOVE_HALF_MOVES {
            return false;
        }

        self.history[self.history.len() - FIFTY_MOVE_HALF_MOVES..]
            .iter()
            .all(|mv| !mv.is_pawn_move() && !mv.is_capture())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new_game()
    }
}

/// 临时走法守卫，离开作用域时恢复棋盘与走子方
struct TemporaryMove<'a> {
    engine: &'a mut Engine,
    from: Square,
    to: Square,
    moving: Option<Piece>,
    captured: Option<Piece>,
    saved_side: Side,
}

impl<'a> TemporaryMove<'a> {
    fn apply(engine: &'a mut Engine, from: Square, to: Square, flip_turn: bool) -> Self {
        let saved_side = engine.side_to_move;
        let moving = engine.board.get(from);
        let captured = engine.board.move_piece(from, to);
        if flip_turn {
            engine.side_to_move = saved_side.opponent();
        }

        Self {
            engine,
            from,
            to,
            moving,
            captured,
            saved_side,
        }
    }
}

impl Drop for TemporaryMove<'_> {
    fn drop(&mut self) {
        self.engine.board.set(self.from, self.moving);
        self.engine.board.set(self.to, self.captured);
        self.engine.side_to_move = self.saved_side;
    }
}

impl Deref for TemporaryMove<'_> {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        &*self.engine
    }
}

impl DerefMut for TemporaryMove<'_> {
    fn deref_mut(&mut self) -> &mut Engine {
        &mut *self.engine
    }
}
