//! 落子规则
//!
//! 几何检查只要求所有牌同行或同列，不检查是否连续、是否与已有牌相邻；
//! 单词提取只按输入顺序拼接本回合的字母，不合并棋盘上的已有牌，
//! 也不处理交叉形成的单词。这是当前规则实现的已知简化。

use crate::game::{GameState, Placement};
use crate::word_validation::WordValidator;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// 落子被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    #[error("还没轮到 {0} 落子")]
    NotYourTurn(String),
    #[error("没有放下任何牌")]
    EmptyPlacement,
    #[error("所有牌必须在同一行或同一列")]
    NotCollinear,
    #[error("坐标越界: ({row}, {col})")]
    OutOfBounds { row: usize, col: usize },
    #[error("格子已有牌: ({row}, {col})")]
    SquareOccupied { row: usize, col: usize },
    #[error("同一格放了多张牌: ({row}, {col})")]
    DuplicateSquare { row: usize, col: usize },
    #[error("放下的牌不在手牌中")]
    TileNotInHand,
    #[error("无效的单词: {0}")]
    InvalidWord(String),
    #[error("上一步棋仍在校验中")]
    MoveInFlight,
    #[error("玩家不存在: {0}")]
    UnknownPlayer(String),
}

/// 单张牌总是合法；多张牌必须同行或同列
pub fn are_tiles_connected(placements: &[Placement]) -> bool {
    match placements.len() {
        0 => false,
        1 => true,
        _ => {
            let rows: HashSet<usize> = placements.iter().map(|p| p.row).collect();
            let cols: HashSet<usize> = placements.iter().map(|p| p.col).collect();
            rows.len() == 1 || cols.len() == 1
        }
    }
}

/// 按输入顺序拼接本回合放下的字母
pub fn get_formed_words(placements: &[Placement]) -> Vec<String> {
    vec![placements.iter().map(|p| p.tile.letter).collect()]
}

/// 落子校验器，单词合法性交给共享的 `WordValidator`
#[derive(Clone)]
pub struct MoveValidator {
    words: Arc<WordValidator>,
}

impl MoveValidator {
    pub fn new(words: Arc<WordValidator>) -> Self {
        MoveValidator { words }
    }

    /// 检查回合与几何，并发校验所有单词
    pub async fn is_valid_move(
        &self,
        state: &GameState,
        player_id: &str,
        placements: &[Placement],
    ) -> bool {
        match self.validate_move(state, player_id, placements).await {
            Ok(()) => true,
            Err(reason) => {
                debug!("落子被拒绝: {}", reason);
                false
            }
        }
    }

    /// 回合与几何检查在调用时立即完成，返回的 future 只借用校验器，
    /// 调用方可以先释放状态锁再等待单词校验
    pub fn validate_move<'a>(
        &'a self,
        state: &GameState,
        player_id: &str,
        placements: &[Placement],
    ) -> impl Future<Output = Result<(), MoveRejection>> + use<'a> {
        let checked = state.check_move(player_id, placements);
        async move {
            let words = checked?;
            debug!("校验单词: {:?}", words);
            self.check_words(&words).await
        }
    }

    /// 所有单词都合法才通过，返回第一个无效单词
    pub async fn check_words(&self, words: &[String]) -> Result<(), MoveRejection> {
        let results = self.words.validate_words(words).await;
        match words.iter().zip(results).find(|(_, valid)| !valid) {
            Some((word, _)) => Err(MoveRejection::InvalidWord(word.clone())),
            None => Ok(()),
        }
    }
}
