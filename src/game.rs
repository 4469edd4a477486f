use crate::board::Board;
use crate::config::GameConfig;
use crate::rules::{self, MoveRejection};
use crate::scoring;
use crate::tile::{Tile, TileBag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 玩家ID类型
pub type PlayerId = String;

/// 玩家信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub tiles: Vec<Tile>,
    pub score: u32,
}

/// 本回合放下的一张牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
}

impl Placement {
    pub fn new(row: usize, col: usize, tile: Tile) -> Self {
        Placement { row, col, tile }
    }
}

/// 已接受的一步棋
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player_id: PlayerId,
    pub placements: Vec<Placement>,
    pub score: u32,
    pub played_at: DateTime<Utc>,
}

/// 对外广播的玩家信息，不包含手牌内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub score: u32,
    pub tile_count: usize,
}

/// 对外广播的只读快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub players: Vec<PlayerSummary>,
    pub current_turn: Option<PlayerId>,
    pub last_move: Option<Move>,
    pub remaining_tiles: usize,
}

/// 单个房间的游戏状态
///
/// 玩家表只用于按ID查找，回合顺序完全由 `turn_order` 决定。
/// 没有定义游戏结束条件：牌袋抽空、手牌变少都是合法状态。
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    tile_bag: TileBag,
    players: HashMap<PlayerId, Player>,
    turn_order: Vec<PlayerId>,
    current_turn: Option<PlayerId>,
    last_move: Option<Move>,
    hand_size: usize,
    max_players: usize,
}

impl GameState {
    /// 创建新的游戏状态
    pub fn new(config: &GameConfig) -> Self {
        Self::with_tile_bag(config, TileBag::new())
    }

    /// 使用指定牌袋创建游戏状态
    pub fn with_tile_bag(config: &GameConfig, tile_bag: TileBag) -> Self {
        GameState {
            board: Board::new(),
            tile_bag,
            players: HashMap::new(),
            turn_order: Vec::new(),
            current_turn: None,
            last_move: None,
            hand_size: config.hand_size,
            max_players: config.max_players,
        }
    }

    /// 添加玩家，已存在的玩家直接返回其手牌
    pub fn add_player(&mut self, player_id: &str) -> crate::Result<Vec<Tile>> {
        if let Some(player) = self.players.get(player_id) {
            return Ok(player.tiles.clone());
        }

        if self.players.len() >= self.max_players {
            return Err(crate::Error::Game(format!(
                "房间已满，最多 {} 名玩家",
                self.max_players
            )));
        }

        let tiles = self.tile_bag.draw(self.hand_size);
        let player = Player {
            id: player_id.to_string(),
            tiles: tiles.clone(),
            score: 0,
        };

        self.players.insert(player_id.to_string(), player);
        self.turn_order.push(player_id.to_string());
        if self.current_turn.is_none() {
            self.current_turn = Some(player_id.to_string());
        }

        Ok(tiles)
    }

    /// 轮到下一位玩家
    pub fn next_turn(&mut self) {
        if self.turn_order.is_empty() {
            return;
        }

        let current_index = self
            .current_turn
            .as_ref()
            .and_then(|id| self.turn_order.iter().position(|p| p == id))
            .unwrap_or(self.turn_order.len() - 1);

        let next_index = (current_index + 1) % self.turn_order.len();
        self.current_turn = Some(self.turn_order[next_index].clone());
    }

    /// 检查一步棋在当前局面下是否可以落子，返回需要校验的单词
    ///
    /// 顺序：回合、非空、共线、坐标与手牌，最后提取单词。
    pub fn check_move(
        &self,
        player_id: &str,
        placements: &[Placement],
    ) -> Result<Vec<String>, MoveRejection> {
        if self.current_turn.as_deref() != Some(player_id) {
            return Err(MoveRejection::NotYourTurn(player_id.to_string()));
        }

        if placements.is_empty() {
            return Err(MoveRejection::EmptyPlacement);
        }

        if !rules::are_tiles_connected(placements) {
            return Err(MoveRejection::NotCollinear);
        }

        let player = self
            .players
            .get(player_id)
            .ok_or_else(|| MoveRejection::UnknownPlayer(player_id.to_string()))?;

        let mut squares = HashSet::new();
        for p in placements {
            if !Board::in_bounds(p.row, p.col) {
                return Err(MoveRejection::OutOfBounds {
                    row: p.row,
                    col: p.col,
                });
            }
            if self.board.is_occupied(p.row, p.col) {
                return Err(MoveRejection::SquareOccupied {
                    row: p.row,
                    col: p.col,
                });
            }
            if !squares.insert((p.row, p.col)) {
                return Err(MoveRejection::DuplicateSquare {
                    row: p.row,
                    col: p.col,
                });
            }
        }

        if remove_from_hand(&player.tiles, placements).is_none() {
            return Err(MoveRejection::TileNotInHand);
        }

        Ok(rules::get_formed_words(placements))
    }

    /// 落子：单词校验通过后调用，要么全部生效，要么不做任何修改
    pub fn apply_move(
        &mut self,
        player_id: &str,
        placements: &[Placement],
    ) -> Result<Move, MoveRejection> {
        self.check_move(player_id, placements)?;

        let player = self
            .players
            .get(player_id)
            .ok_or_else(|| MoveRejection::UnknownPlayer(player_id.to_string()))?;
        let mut hand =
            remove_from_hand(&player.tiles, placements).ok_or(MoveRejection::TileNotInHand)?;

        for p in placements {
            self.board.place(p.row, p.col, p.tile);
        }

        let score = scoring::calculate_score(placements);
        hand.extend(self.tile_bag.draw(placements.len()));

        if let Some(player) = self.players.get_mut(player_id) {
            player.score += score;
            player.tiles = hand;
        }

        let mv = Move {
            player_id: player_id.to_string(),
            placements: placements.to_vec(),
            score,
            played_at: Utc::now(),
        };
        self.last_move = Some(mv.clone());
        self.next_turn();

        Ok(mv)
    }

    /// 获取对外广播的快照
    pub fn get_game_state(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            players: self
                .turn_order
                .iter()
                .filter_map(|id| self.players.get(id))
                .map(|p| PlayerSummary {
                    id: p.id.clone(),
                    score: p.score,
                    tile_count: p.tiles.len(),
                })
                .collect(),
            current_turn: self.current_turn.clone(),
            last_move: self.last_move.clone(),
            remaining_tiles: self.tile_bag.remaining(),
        }
    }

    /// 获取玩家手牌，玩家不存在时返回空
    pub fn get_player_tiles(&self, player_id: &str) -> Vec<Tile> {
        self.players
            .get(player_id)
            .map(|p| p.tiles.clone())
            .unwrap_or_default()
    }

    pub fn current_turn(&self) -> Option<&str> {
        self.current_turn.as_deref()
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn remaining_tiles(&self) -> usize {
        self.tile_bag.remaining()
    }

    /// 牌袋、手牌、棋盘上的牌数合计
    pub fn tiles_in_play(&self) -> usize {
        self.tile_bag.remaining()
            + self.players.values().map(|p| p.tiles.len()).sum::<usize>()
            + self.board.tile_count()
    }
}

/// 从手牌中逐张移除放下的牌，有牌不在手中则返回 None
fn remove_from_hand(hand: &[Tile], placements: &[Placement]) -> Option<Vec<Tile>> {
    let mut remaining = hand.to_vec();
    for p in placements {
        let index = remaining.iter().position(|t| *t == p.tile)?;
        remaining.remove(index);
    }
    Some(remaining)
}
