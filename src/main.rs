use scrabble_engine::tile::letter_score;
use scrabble_engine::*;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化全局配置
    Config::init()?;
    let config = Config::get();

    // 初始化日志
    tracing_subscriber::registry()
        .with(EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("配置加载成功: {:?}", config);

    // 单词校验服务全进程共享
    let words = Arc::new(WordValidator::from_config(config)?);
    let room = Room::new("local", &config.game, words);

    let mut events = room.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            print_message(&GameMessage::from(&event)).await;
        }
    });

    tracing::info!("房间 {} 已就绪，命令: join / move / state / tiles / quit", room.id());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| Error::Internal(e.into()))?
    {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("join"), Some(player_id)) => match room.add_player(player_id).await {
                Ok(tiles) => print_message(&GameMessage::hand(player_id, &tiles)).await,
                Err(e) => print_message(&GameMessage::error(&e.to_string())).await,
            },
            (Some("move"), Some(player_id)) => {
                let placements: Option<Vec<Placement>> = parts.map(parse_placement).collect();
                match placements {
                    Some(placements) => {
                        room.make_move(player_id, &placements).await;
                    }
                    None => {
                        print_message(&GameMessage::error("格式: move <玩家> <行>,<列>,<字母> ..."))
                            .await
                    }
                }
            }
            (Some("state"), None) => {
                print_message(&GameMessage::state_update(&room.get_game_state().await)).await
            }
            (Some("tiles"), Some(player_id)) => {
                let tiles = room.get_player_tiles(player_id).await;
                print_message(&GameMessage::hand(player_id, &tiles)).await
            }
            (Some("quit"), None) => break,
            (None, _) => {}
            _ => print_message(&GameMessage::error("未知的命令")).await,
        }
    }

    Ok(())
}

/// 解析 `行,列,字母`，字母分值按分布表计算
fn parse_placement(spec: &str) -> Option<Placement> {
    let mut fields = spec.split(',');
    let row = fields.next()?.trim().parse().ok()?;
    let col = fields.next()?.trim().parse().ok()?;
    let letter = fields.next()?.trim().chars().next()?.to_ascii_uppercase();
    if fields.next().is_some() {
        return None;
    }
    let score = letter_score(letter)?;
    Some(Placement::new(row, col, Tile::new(letter, score)))
}

async fn print_message(message: &GameMessage) {
    let mut stdout = tokio::io::stdout();
    if let Err(e) = write_message(&mut stdout, message).await {
        tracing::error!("输出消息失败: {}", e);
    }
}

/// 写入一行 JSON 并刷新
async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &GameMessage,
) -> std::io::Result<()> {
    let json = serde_json::to_string(message)?;
    writer.write_all(format!("{}\n", json).as_bytes()).await?;
    writer.flush().await
}
