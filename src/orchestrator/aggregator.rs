//! 结果合并
//!
//! 把最新在前的批次结果合并为一份 Markdown 文本。

use crate::models::analysis::{BatchResult, TokenUsage};

/// 段落之间的分隔
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// 合并所有批次结果
///
/// `results` 为最新在前的顺序，位置 `i` 对应的批次编号为 `len - i`。
/// 只有一个结果时不加标题。拼接顺序与输入相同，即最新批次排在最前。
pub fn combine_results(results: &[BatchResult]) -> String {
    let count = results.len();
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let header = if count > 1 {
                format!("## Batch {} Analysis Results\n\n", count - i)
            } else {
                String::new()
            };
            format!("{}{}{}", header, result.analysis, SECTION_SEPARATOR)
        })
        .collect()
}

/// 汇总所有带用量信息的结果；都没有用量时返回 `None`
pub fn total_usage(results: &[BatchResult]) -> Option<TokenUsage> {
    results
        .iter()
        .filter_map(|r| r.usage)
        .fold(None, |acc: Option<TokenUsage>, usage| {
            let mut total = acc.unwrap_or_default();
            total += usage;
            Some(total)
        })
}
