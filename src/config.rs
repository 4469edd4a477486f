use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::time::Duration;

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub validator: ValidatorConfig,
    pub dictionary: DictionaryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_players: usize,
    pub hand_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_players: 4,
            hand_size: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// 每个窗口内最多发出的外部查询数
    pub max_requests_per_window: u32,
    pub window_secs: u64,
    /// 相邻两次外部查询之间的间隔
    pub pacing_ms: u64,
    /// 达到限流后重新检查的间隔
    pub retry_delay_ms: u64,
    /// 缓存上限，超出后淘汰最早写入的单词
    pub cache_capacity: usize,
    pub word_list_file: Option<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            max_requests_per_window: 10,
            window_secs: 60,
            pacing_ms: 100,
            retry_delay_ms: 1000,
            cache_capacity: 10_000,
            word_list_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub base_url: String,
    /// 保存 API key 的环境变量名
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        DictionaryConfig {
            base_url: "https://www.dictionaryapi.com/api/v3/references/collegiate/json/"
                .to_string(),
            api_key_env: "DICTIONARY_API_KEY".to_string(),
            timeout_secs: 10,
            user_agent: concat!("scrabble-engine/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SCRABBLE").separator("__"))
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }

    /// 初始化全局配置
    pub fn init() -> Result<()> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| anyhow::anyhow!("配置已经初始化"))?;
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static Config {
        CONFIG.get().expect("配置未初始化，请先调用 Config::init()")
    }

    pub fn log_filter(&self) -> String {
        format!("scrabble_engine={}", self.log.level)
    }

    /// 从环境变量读取词典 API key，未设置或为空时返回 None
    pub fn dictionary_api_key(&self) -> Option<String> {
        std::env::var(&self.dictionary.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl ValidatorConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl DictionaryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
