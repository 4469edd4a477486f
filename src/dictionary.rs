use crate::Result;
use anyhow::Context;
use std::collections::HashSet;
use tracing::{debug, warn};

/// 内置常用词表，每行一个小写单词
const COMMON_WORDS: &str = include_str!("../data/common_words.txt");

/// 离线词典：进程内的静态词集合，在访问外部词典接口之前查询
#[derive(Debug, Clone)]
pub struct OfflineDictionary {
    words: HashSet<String>,
}

impl OfflineDictionary {
    /// 加载内置词表
    pub fn new() -> Self {
        Self::from_words(COMMON_WORDS.lines())
    }

    /// 使用内置词表，并尝试合并额外的词表文件
    pub fn with_word_list(path: Option<&str>) -> Self {
        let mut dictionary = Self::new();
        if let Some(path) = path {
            match dictionary.load_from_file(path) {
                Ok(added) => debug!("从 {} 加载了 {} 个单词", path, added),
                Err(e) => warn!("无法加载词表文件: {}, 仅使用内置词表", e),
            }
        }
        dictionary
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = OfflineDictionary {
            words: HashSet::new(),
        };
        dictionary.extend(words);
        dictionary
    }

    /// 从文件合并词表，返回新增单词数
    pub fn load_from_file(&mut self, path: &str) -> Result<usize> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("无法读取词表文件: {}", path))?;

        let before = self.words.len();
        self.extend(content.lines());
        Ok(self.words.len() - before)
    }

    fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty() && !w.starts_with('#')),
        );
    }

    pub fn is_valid_word(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for OfflineDictionary {
    fn default() -> Self {
        Self::new()
    }
}
