//! 关键词规范化 - 业务能力层
//!
//! 只负责把原始文本变成 `KeywordSet`，不关心批次和会话

use std::collections::HashSet;
use tracing::debug;

use crate::error::KeywordError;
use crate::models::keyword::{Keyword, KeywordSet};

/// 规范化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// 切分、去空白、去空片段后的原始关键词数量（含重复和纯数字）
    pub raw_count: usize,
    pub keywords: KeywordSet,
}

/// 按逗号或换行切分，去除首尾空白并丢弃空片段
pub fn split_raw(raw_text: &str) -> Vec<&str> {
    raw_text
        .split([',', '\n'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// 规范化原始输入
///
/// 处理顺序：
/// 1. 按 `,` / `\n` 切分并去空白
/// 2. 去重（大小写敏感，保留首次出现的顺序）
/// 3. 过滤纯数字关键词
///
/// 输入为空白时返回 `InputEmpty`，过滤后为空时返回 `NoValidKeywords`。
pub fn normalize(raw_text: &str) -> Result<Normalized, KeywordError> {
    if raw_text.trim().is_empty() {
        return Err(KeywordError::InputEmpty);
    }

    let pieces = split_raw(raw_text);
    let raw_count = pieces.len();

    let mut seen = HashSet::with_capacity(raw_count);
    let keywords: Vec<Keyword> = pieces
        .into_iter()
        .filter(|piece| seen.insert(*piece))
        .filter_map(Keyword::parse)
        .collect();

    debug!(
        "关键词规范化: 原始 {} 个, 有效 {} 个",
        raw_count,
        keywords.len()
    );

    if keywords.is_empty() {
        return Err(KeywordError::NoValidKeywords { raw_count });
    }

    Ok(Normalized {
        raw_count,
        keywords: KeywordSet::from_unique(keywords),
    })
}
