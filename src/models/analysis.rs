//! 分析接口的请求/响应结构，以及批次分析结果

use crate::models::batch::Batch;
use crate::models::keyword::Keyword;
use serde::{Deserialize, Serialize};

/// 接口返回空数组时写入结果的兜底文本
pub const DEGRADED_RESPONSE: &str = "analysis failed";

/// 请求体：`{ "keywords": [...] }`
#[derive(Debug, Serialize)]
pub struct AnalysisRequest<'a> {
    pub keywords: &'a [Keyword],
}

/// 接口返回数组中的单个元素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default)]
    pub inputs: Vec<String>,
    pub response: AnalysisPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Token 用量统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt_tokens += rhs.prompt_tokens;
        self.completion_tokens += rhs.completion_tokens;
        self.total_tokens += rhs.total_tokens;
    }
}

/// 单个批次的分析结果，仅在接口调用成功时产生
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// 提交的关键词
    pub inputs: Vec<String>,
    /// 分析文本（Markdown）
    pub analysis: String,
    pub usage: Option<TokenUsage>,
    /// 接口返回空数组时生成的兜底结果
    pub degraded: bool,
}

impl BatchResult {
    /// 取响应数组的第一个元素；数组为空时生成兜底结果而不是报错
    pub fn from_records(batch: &Batch, records: Vec<AnalysisRecord>) -> Self {
        match records.into_iter().next() {
            Some(record) => Self {
                inputs: record.inputs,
                analysis: record.response.response,
                usage: record.response.usage,
                degraded: false,
            },
            None => Self::degraded(batch),
        }
    }

    pub fn degraded(batch: &Batch) -> Self {
        Self {
            inputs: batch.to_strings(),
            analysis: DEGRADED_RESPONSE.to_string(),
            usage: None,
            degraded: true,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}
