pub mod board;
pub mod config;
pub mod dictionary;
pub mod game;
pub mod message;
pub mod rate_limit;
pub mod room;
pub mod rules;
pub mod scoring;
pub mod tile;
pub mod word_validation;

pub use board::{Board, PremiumSquare, premium_square_at};
pub use config::Config;
pub use dictionary::OfflineDictionary;
pub use game::{GameSnapshot, GameState, Move, Placement, PlayerId};
pub use message::{GameEvent, GameMessage};
pub use room::Room;
pub use rules::{MoveRejection, MoveValidator};
pub use tile::{Tile, TileBag};
pub use word_validation::{DictionaryClient, HttpDictionaryClient, WordValidator};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
    #[error("网络错误: {0}")]
    Network(String),
    #[error("游戏错误: {0}")]
    Game(String),
    #[error("配置错误: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
