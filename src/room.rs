use crate::Result;
use crate::config::GameConfig;
use crate::game::{GameSnapshot, GameState, Move, Placement};
use crate::message::GameEvent;
use crate::rules::{MoveRejection, MoveValidator};
use crate::tile::Tile;
use crate::word_validation::WordValidator;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

const EVENT_CAPACITY: usize = 64;

/// 游戏房间，持有一局游戏的状态
///
/// 单词校验可能需要等待外部接口，期间不持有状态锁；
/// 同一房间同时只允许一步棋处于校验中，其余落子请求直接拒绝。
pub struct Room {
    id: String,
    state: RwLock<GameState>,
    validator: MoveValidator,
    move_in_flight: AtomicBool,
    events: broadcast::Sender<GameEvent>,
}

/// 离开作用域时清除校验中标记
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Room {
    /// 创建新房间
    pub fn new(id: impl Into<String>, config: &GameConfig, words: Arc<WordValidator>) -> Self {
        Self::with_state(id, GameState::new(config), words)
    }

    /// 使用已有的游戏状态创建房间
    pub fn with_state(id: impl Into<String>, state: GameState, words: Arc<WordValidator>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Room {
            id: id.into(),
            state: RwLock::new(state),
            validator: MoveValidator::new(words),
            move_in_flight: AtomicBool::new(false),
            events,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 订阅房间事件
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// 添加玩家，返回其手牌；重复加入不会改变任何状态
    pub async fn add_player(&self, player_id: &str) -> Result<Vec<Tile>> {
        let mut state = self.state.write().await;
        let is_new = state.player(player_id).is_none();
        let tiles = state.add_player(player_id)?;
        drop(state);

        if is_new {
            info!("玩家 {} 加入房间 {}", player_id, self.id);
            self.publish(GameEvent::PlayerJoined(player_id.to_string()));
        }

        Ok(tiles)
    }

    /// 落子，成功返回 true；失败时不修改任何状态
    pub async fn make_move(&self, player_id: &str, placements: &[Placement]) -> bool {
        match self.try_move(player_id, placements).await {
            Ok(mv) => {
                info!(
                    "房间 {} 玩家 {} 落子 {} 张，得分 {}",
                    self.id,
                    player_id,
                    mv.placements.len(),
                    mv.score
                );
                self.publish(GameEvent::MoveApplied(mv));
                true
            }
            Err(reason) => {
                info!("房间 {} 拒绝玩家 {} 的落子: {}", self.id, player_id, reason);
                self.publish(GameEvent::MoveRejected {
                    player_id: player_id.to_string(),
                    reason: reason.to_string(),
                });
                false
            }
        }
    }

    /// 落子并返回具体的拒绝原因
    pub async fn try_move(
        &self,
        player_id: &str,
        placements: &[Placement],
    ) -> std::result::Result<Move, MoveRejection> {
        if self
            .move_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(MoveRejection::MoveInFlight);
        }
        let _guard = InFlightGuard(&self.move_in_flight);

        let validation = {
            let state = self.state.read().await;
            self.validator.validate_move(&state, player_id, placements)
        };
        debug!("房间 {} 等待玩家 {} 的单词校验", self.id, player_id);
        validation.await?;

        let mut state = self.state.write().await;
        state.apply_move(player_id, placements)
    }

    /// 获取广播用的快照
    pub async fn get_game_state(&self) -> GameSnapshot {
        self.state.read().await.get_game_state()
    }

    /// 获取玩家手牌
    pub async fn get_player_tiles(&self, player_id: &str) -> Vec<Tile> {
        self.state.read().await.get_player_tiles(player_id)
    }

    pub fn is_move_in_flight(&self) -> bool {
        self.move_in_flight.load(Ordering::Acquire)
    }

    fn publish(&self, event: GameEvent) {
        // 没有订阅者时发送失败，忽略即可
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::dictionary::OfflineDictionary;
    use crate::tile::{TileBag, letter_score};

    fn tile(letter: char) -> Tile {
        Tile::new(letter, letter_score(letter).unwrap_or(0))
    }

    fn room_with_bag(letters: &str, words: &[&str]) -> Room {
        let mut tiles: Vec<Tile> = letters.chars().map(tile).collect();
        tiles.reverse();
        let state = GameState::with_tile_bag(&GameConfig::default(), TileBag::from_tiles(tiles));
        let validator = WordValidator::new(
            ValidatorConfig::default(),
            OfflineDictionary::from_words(words.iter().copied()),
            None,
        );
        Room::with_state("room-1", state, Arc::new(validator))
    }

    #[tokio::test]
    async fn test_accepted_move_advances_turn_and_scores() {
        let room = room_with_bag("CATSXYZDOGSQRTEEEEE", &["cat", "dog"]);
        let mut events = room.subscribe();

        room.add_player("p1").await.unwrap();
        room.add_player("p2").await.unwrap();

        let placements = vec![
            Placement::new(7, 6, tile('C')),
            Placement::new(7, 7, tile('A')),
            Placement::new(7, 8, tile('T')),
        ];
        assert!(room.make_move("p1", &placements).await);

        let snapshot = room.get_game_state().await;
        assert_eq!(snapshot.current_turn.as_deref(), Some("p2"));
        assert_eq!(snapshot.players[0].score, 5);
        assert_eq!(snapshot.players[0].tile_count, 7);
        assert_eq!(snapshot.last_move.as_ref().map(|m| m.score), Some(5));
        assert_eq!(snapshot.remaining_tiles, 2);

        assert!(matches!(events.recv().await, Ok(GameEvent::PlayerJoined(id)) if id == "p1"));
        assert!(matches!(events.recv().await, Ok(GameEvent::PlayerJoined(id)) if id == "p2"));
        assert!(matches!(events.recv().await, Ok(GameEvent::MoveApplied(mv)) if mv.score == 5));
    }

    #[tokio::test]
    async fn test_rejected_move_changes_nothing() {
        let room = room_with_bag("CATSXYZDOGSQRT", &["cat", "dog"]);
        room.add_player("p1").await.unwrap();
        room.add_player("p2").await.unwrap();
        let before = room.get_player_tiles("p1").await;

        let placements = vec![
            Placement::new(7, 7, tile('T')),
            Placement::new(7, 8, tile('A')),
            Placement::new(7, 9, tile('C')),
        ];
        assert!(!room.make_move("p1", &placements).await);
        assert_eq!(
            room.try_move("p1", &placements).await,
            Err(MoveRejection::InvalidWord("TAC".to_string()))
        );

        let snapshot = room.get_game_state().await;
        assert_eq!(snapshot.current_turn.as_deref(), Some("p1"));
        assert_eq!(snapshot.board.tile_count(), 0);
        assert!(snapshot.last_move.is_none());
        assert_eq!(room.get_player_tiles("p1").await, before);
        assert!(!room.is_move_in_flight());
    }

    #[tokio::test]
    async fn test_rejoin_does_not_emit_event() {
        let room = room_with_bag("CATSXYZ", &[]);
        room.add_player("p1").await.unwrap();
        let mut events = room.subscribe();

        room.add_player("p1").await.unwrap();
        assert!(events.try_recv().is_err());
        assert_eq!(room.get_game_state().await.players.len(), 1);
    }
}
