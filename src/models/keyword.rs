//! 关键词模型

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// 纯数字（整数或小数）关键词
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("numeric pattern compiles"));

/// 单个关键词
///
/// 不变量：已去除首尾空白、非空、不是纯数字。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Keyword(String);

impl Keyword {
    /// 从原始片段构造关键词，不满足不变量时返回 `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || is_numeric(trimmed) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 判断片段是否为纯数字（如 `42`、`3.14`）
pub fn is_numeric(token: &str) -> bool {
    NUMERIC.is_match(token.trim())
}

/// 去重后的关键词序列，保持首次出现的顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// 由规范化器构造，调用方保证元素唯一
    pub(crate) fn from_unique(keywords: Vec<Keyword>) -> Self {
        Self { keywords }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn as_slice(&self) -> &[Keyword] {
        &self.keywords
    }

    /// 以字符串形式导出，便于比较和展示
    pub fn to_strings(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.0.clone()).collect()
    }
}
