use clap::{App, Arg};
use scrabble_engine::board::{BOARD_SIZE, premium_square_at};
use scrabble_engine::config::Config;
use scrabble_engine::word_validation::WordValidator;

#[tokio::main]
async fn main() {
    let matches = App::new("单词检查工具")
        .version("1.0")
        .about("通过缓存、离线词典和外部词典接口检查单词")
        .subcommand(
            App::new("check").about("检查单词是否有效").arg(
                Arg::new("words")
                    .help("要检查的单词")
                    .required(true)
                    .multiple_values(true)
                    .index(1),
            ),
        )
        .subcommand(App::new("stats").about("显示词典信息"))
        .subcommand(App::new("premium").about("打印奖励格分布"))
        .get_matches();

    // 初始化配置
    if let Err(e) = Config::init() {
        eprintln!("配置初始化失败: {}", e);
        return;
    }
    let config = Config::get();

    match matches.subcommand() {
        Some(("check", args)) => {
            let validator = match WordValidator::from_config(config) {
                Ok(validator) => validator,
                Err(e) => {
                    eprintln!("创建单词校验服务失败: {}", e);
                    return;
                }
            };

            let words: Vec<String> = args
                .values_of("words")
                .map(|values| values.map(str::to_string).collect())
                .unwrap_or_default();
            let results = validator.validate_words(&words).await;

            for (word, valid) in words.iter().zip(results) {
                println!("  {}: {}", word, if valid { "有效" } else { "无效" });
            }
        }
        Some(("stats", _)) => {
            let validator = match WordValidator::from_config(config) {
                Ok(validator) => validator,
                Err(e) => {
                    eprintln!("创建单词校验服务失败: {}", e);
                    return;
                }
            };
            println!("词典信息:");
            println!("  离线词数: {}", validator.offline_dictionary().len());
            println!(
                "  外部查询: {}",
                if validator.has_external_lookup() {
                    "已启用"
                } else {
                    "未启用"
                }
            );
            println!(
                "  限流: 每 {} 秒 {} 次",
                config.validator.window_secs, config.validator.max_requests_per_window
            );
        }
        Some(("premium", _)) => {
            for row in 0..BOARD_SIZE {
                let line: Vec<String> = (0..BOARD_SIZE)
                    .map(|col| premium_square_at(row, col).to_string())
                    .collect();
                println!("{}", line.join(" "));
            }
        }
        _ => {
            println!("请使用 --help 查看可用命令");
        }
    }
}
