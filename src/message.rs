use crate::game::{GameSnapshot, Move, PlayerId};
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// 发给传输层的消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMessage {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: serde_json::Value,
}

impl GameMessage {
    pub fn new(type_: &str, data: serde_json::Value) -> Self {
        GameMessage {
            type_: type_.to_string(),
            data,
        }
    }

    /// 广播用的状态更新
    pub fn state_update(snapshot: &GameSnapshot) -> Self {
        Self::new(
            "state_update",
            serde_json::to_value(snapshot).unwrap_or(serde_json::Value::Null),
        )
    }

    /// 只发给玩家本人的手牌
    pub fn hand(player_id: &str, tiles: &[Tile]) -> Self {
        Self::new(
            "hand",
            serde_json::json!({
                "player_id": player_id,
                "tiles": tiles,
            }),
        )
    }

    pub fn error(message: &str) -> Self {
        Self::new("error", serde_json::json!({ "message": message }))
    }
}

/// 房间内发生的事件
#[derive(Debug, Clone)]
pub enum GameEvent {
    PlayerJoined(PlayerId),
    MoveApplied(Move),
    MoveRejected { player_id: PlayerId, reason: String },
}

impl From<&GameEvent> for GameMessage {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::PlayerJoined(player_id) => GameMessage::new(
                "notification",
                serde_json::json!({
                    "message": format!("玩家 {} 加入了游戏", player_id),
                    "player_id": player_id,
                }),
            ),
            GameEvent::MoveApplied(mv) => GameMessage::new(
                "move",
                serde_json::to_value(mv).unwrap_or(serde_json::Value::Null),
            ),
            GameEvent::MoveRejected { player_id, reason } => GameMessage::new(
                "move_rejected",
                serde_json::json!({
                    "player_id": player_id,
                    "reason": reason,
                }),
            ),
        }
    }
}
