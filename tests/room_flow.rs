//! 房间层面的完整流程测试

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use scrabble_engine::config::{GameConfig, ValidatorConfig};
use scrabble_engine::tile::letter_score;
use scrabble_engine::{
    DictionaryClient, GameState, MoveRejection, OfflineDictionary, Placement, Room, Tile,
    TileBag, WordValidator,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

fn tile(letter: char) -> Tile {
    Tile::new(letter, letter_score(letter).unwrap_or(0))
}

/// 按字符串顺序抽牌的牌袋
fn bag(letters: &str) -> TileBag {
    let mut tiles: Vec<Tile> = letters.chars().map(tile).collect();
    tiles.reverse();
    TileBag::from_tiles(tiles)
}

fn word_at(row: usize, col: usize, word: &str, across: bool) -> Vec<Placement> {
    word.chars()
        .enumerate()
        .map(|(i, c)| {
            if across {
                Placement::new(row, col + i, tile(c))
            } else {
                Placement::new(row + i, col, tile(c))
            }
        })
        .collect()
}

/// 在放行之前一直挂起的词典接口
struct GatedClient {
    gate: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl DictionaryClient for GatedClient {
    async fn lookup(&self, word: &str) -> anyhow::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(json!([{ "meta": { "id": word } }]))
    }
}

#[tokio::test]
async fn scripted_two_player_game() {
    let letters = "CATSEARDOGSBEEQUIZMOP";
    let state = GameState::with_tile_bag(&GameConfig::default(), bag(letters));
    let validator = WordValidator::new(ValidatorConfig::default(), OfflineDictionary::new(), None);
    let room = Room::with_state("scripted", state, Arc::new(validator));

    assert_eq!(room.add_player("p1").await.unwrap().len(), 7);
    assert_eq!(room.add_player("p2").await.unwrap().len(), 7);

    assert!(room.make_move("p1", &word_at(7, 7, "CAT", true)).await);
    assert!(!room.make_move("p1", &word_at(3, 3, "SEA", true)).await);
    assert!(room.make_move("p2", &word_at(8, 7, "DOG", false)).await);
    assert!(room.make_move("p1", &word_at(0, 0, "SEA", true)).await);

    let snapshot = room.get_game_state().await;
    assert_eq!(snapshot.current_turn.as_deref(), Some("p2"));
    assert_eq!(snapshot.players[0].score, 5 + 9);
    assert_eq!(snapshot.players[1].score, 5);
    assert_eq!(snapshot.players[0].tile_count, 5);
    assert_eq!(snapshot.players[1].tile_count, 7);
    assert_eq!(snapshot.remaining_tiles, 0);
    assert_eq!(snapshot.board.tile_count(), 9);

    let in_hands: usize = snapshot.players.iter().map(|p| p.tile_count).sum();
    assert_eq!(
        snapshot.remaining_tiles + in_hands + snapshot.board.tile_count(),
        letters.len()
    );

    let last = snapshot.last_move.unwrap();
    assert_eq!(last.player_id, "p1");
    assert_eq!(last.score, 9);

    assert_eq!(
        room.get_player_tiles("p1").await,
        vec![tile('R'), tile('Q'), tile('U'), tile('I'), tile('P')]
    );
}

#[tokio::test]
async fn move_onto_occupied_square_is_rejected() {
    let state = GameState::with_tile_bag(&GameConfig::default(), bag("CATSEARDOGSBEE"));
    let validator = WordValidator::new(ValidatorConfig::default(), OfflineDictionary::new(), None);
    let room = Room::with_state("occupied", state, Arc::new(validator));
    room.add_player("p1").await.unwrap();
    room.add_player("p2").await.unwrap();

    assert!(room.make_move("p1", &word_at(7, 7, "CAT", true)).await);
    assert_eq!(
        room.try_move("p2", &word_at(7, 7, "DOG", false)).await,
        Err(MoveRejection::SquareOccupied { row: 7, col: 7 })
    );
}

#[tokio::test]
async fn second_move_is_rejected_while_first_is_validating() {
    let client = Arc::new(GatedClient {
        gate: Notify::new(),
        calls: AtomicUsize::new(0),
    });
    let dyn_client: Arc<dyn DictionaryClient> = client.clone();
    let validator = WordValidator::new(
        ValidatorConfig::default(),
        OfflineDictionary::from_words(Vec::<String>::new()),
        Some(dyn_client),
    );
    let state = GameState::with_tile_bag(&GameConfig::default(), bag("ZAXQUITDOGSBEE"));
    let room = Arc::new(Room::with_state("gated", state, Arc::new(validator)));
    room.add_player("p1").await.unwrap();
    room.add_player("p2").await.unwrap();

    let placements = word_at(7, 7, "ZAX", true);
    let pending = {
        let room = room.clone();
        let placements = placements.clone();
        tokio::spawn(async move { room.make_move("p1", &placements).await })
    };

    while client.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    assert!(room.is_move_in_flight());
    assert_eq!(
        room.try_move("p1", &placements).await,
        Err(MoveRejection::MoveInFlight)
    );
    assert_eq!(room.get_game_state().await.current_turn.as_deref(), Some("p1"));

    // 单词校验期间不持有状态锁，其他玩家仍可加入
    let joined = tokio::time::timeout(Duration::from_secs(1), room.add_player("p3")).await;
    assert!(matches!(joined, Ok(Ok(_))));

    client.gate.notify_one();
    assert!(pending.await.unwrap());

    assert!(!room.is_move_in_flight());
    let snapshot = room.get_game_state().await;
    assert_eq!(snapshot.current_turn.as_deref(), Some("p2"));
    assert_eq!(snapshot.players[0].score, 10 + 1 + 8);
}
