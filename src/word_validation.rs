//! 单词校验服务
//!
//! 查询顺序：缓存 → 离线词典 → 外部词典接口。外部查询进入 FIFO 队列，
//! 由唯一的后台任务按顺序发出，受 `RateLimiter` 限流并在两次请求间留出间隔。
//! 整个进程共享一个实例，由启动代码创建后注入到各个房间。

use crate::config::{Config, DictionaryConfig, ValidatorConfig};
use crate::dictionary::OfflineDictionary;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::future::join_all;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use url::Url;

/// 外部词典接口
#[async_trait]
pub trait DictionaryClient: Send + Sync {
    /// 查询单词，返回解析后的 JSON 响应
    async fn lookup(&self, word: &str) -> anyhow::Result<Value>;
}

/// 响应是非空数组且首个元素是对象时，单词有效
pub fn is_valid_response(value: &Value) -> bool {
    value
        .as_array()
        .and_then(|entries| entries.first())
        .is_some_and(Value::is_object)
}

/// 基于 HTTPS 的词典接口客户端
pub struct HttpDictionaryClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpDictionaryClient {
    pub fn new(config: &DictionaryConfig, api_key: String) -> crate::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| crate::Error::Config(format!("无效的词典地址: {}", e)))?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| crate::Error::Network(e.to_string()))?;

        Ok(HttpDictionaryClient {
            client,
            base_url,
            api_key,
        })
    }

    /// 生成查询地址: <base>/<word>?key=<api_key>
    pub fn lookup_url(&self, word: &str) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("词典地址不能作为路径前缀: {}", self.base_url))?
            .pop_if_empty()
            .push(word);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl DictionaryClient for HttpDictionaryClient {
    async fn lookup(&self, word: &str) -> anyhow::Result<Value> {
        let url = self.lookup_url(word)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("无法解析词典响应 (状态码 {}): {}", status, e))
    }
}

/// 单词缓存，写入是幂等的；超出容量时淘汰最早写入的单词
struct WordCache {
    entries: DashMap<String, bool>,
    order: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl WordCache {
    fn new(capacity: usize) -> Self {
        WordCache {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    fn get(&self, word: &str) -> Option<bool> {
        self.entries.get(word).map(|entry| *entry.value())
    }

    fn insert(&self, word: String, valid: bool) {
        if self.entries.insert(word.clone(), valid).is_some() {
            return;
        }

        let mut order = match self.order.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        order.push_back(word);

        // 容量为 0 表示不限制
        while self.capacity > 0 && order.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                self.entries.remove(&oldest);
                debug!("缓存已满，淘汰单词: {}", oldest);
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// 排队等待外部查询的单词
struct LookupRequest {
    word: String,
    reply: oneshot::Sender<bool>,
}

/// 唯一的外部查询任务，独占队列接收端
struct LookupWorker {
    queue: mpsc::UnboundedReceiver<LookupRequest>,
    cache: Arc<WordCache>,
    client: Arc<dyn DictionaryClient>,
    limiter: RateLimiter,
    pacing: Duration,
    retry_delay: Duration,
}

impl LookupWorker {
    async fn run(mut self) {
        while let Some(request) = self.queue.recv().await {
            // 排队期间可能已有相同单词的结果
            if let Some(valid) = self.cache.get(&request.word) {
                let _ = request.reply.send(valid);
                continue;
            }

            while !self.limiter.check() {
                debug!(
                    "外部查询已达上限 ({} 次)，窗口 {:?} 后重置",
                    self.limiter.used(),
                    self.limiter.time_until_reset()
                );
                tokio::time::sleep(self.retry_delay).await;
            }

            let valid = self.dispatch(&request.word).await;
            let _ = request.reply.send(valid);

            tokio::time::sleep(self.pacing).await;
        }

        debug!("单词查询队列已关闭");
    }

    /// 网络或解析失败时返回 false 且不写缓存，下次出现可重试
    async fn dispatch(&self, word: &str) -> bool {
        debug!("查询外部词典: {}", word);
        match self.client.lookup(word).await {
            Ok(response) => {
                let valid = is_valid_response(&response);
                self.cache.insert(word.to_string(), valid);
                valid
            }
            Err(e) => {
                warn!("词典接口查询失败: {} - {:#}", word, e);
                false
            }
        }
    }
}

/// 进程级单词校验服务
pub struct WordValidator {
    cache: Arc<WordCache>,
    offline: OfflineDictionary,
    queue: Option<mpsc::UnboundedSender<LookupRequest>>,
}

impl WordValidator {
    /// 创建校验服务；提供外部客户端时会启动后台查询任务，需要在 tokio 运行时中调用
    pub fn new(
        config: ValidatorConfig,
        offline: OfflineDictionary,
        client: Option<Arc<dyn DictionaryClient>>,
    ) -> Self {
        let cache = Arc::new(WordCache::new(config.cache_capacity));

        let queue = client.map(|client| {
            let (tx, rx) = mpsc::unbounded_channel();
            let worker = LookupWorker {
                queue: rx,
                cache: cache.clone(),
                client,
                limiter: RateLimiter::new(config.window(), config.max_requests_per_window),
                pacing: config.pacing(),
                retry_delay: config.retry_delay(),
            };
            tokio::spawn(worker.run());
            tx
        });

        WordValidator {
            cache,
            offline,
            queue,
        }
    }

    /// 按全局配置创建，只有设置了 API key 才启用外部查询
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let offline = OfflineDictionary::with_word_list(config.validator.word_list_file.as_deref());

        let client: Option<Arc<dyn DictionaryClient>> = match config.dictionary_api_key() {
            Some(api_key) => Some(Arc::new(HttpDictionaryClient::new(
                &config.dictionary,
                api_key,
            )?)),
            None => {
                info!("未配置词典 API key，只使用离线词典");
                None
            }
        };

        Ok(Self::new(config.validator.clone(), offline, client))
    }

    /// 判断单词是否有效，大小写不敏感
    pub async fn is_valid_word(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        if word.is_empty() {
            return false;
        }

        if let Some(valid) = self.cache.get(&word) {
            return valid;
        }

        if self.offline.is_valid_word(&word) {
            self.cache.insert(word, true);
            return true;
        }

        let Some(queue) = &self.queue else {
            return false;
        };

        let (reply, result) = oneshot::channel();
        if queue.send(LookupRequest { word, reply }).is_err() {
            warn!("单词查询队列已关闭");
            return false;
        }

        result.await.unwrap_or(false)
    }

    /// 并发校验多个单词，结果顺序与输入一致
    pub async fn validate_words(&self, words: &[String]) -> Vec<bool> {
        join_all(words.iter().map(|word| self.is_valid_word(word))).await
    }

    pub fn has_external_lookup(&self) -> bool {
        self.queue.is_some()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn offline_dictionary(&self) -> &OfflineDictionary {
        &self.offline
    }
}
