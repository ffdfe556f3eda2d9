/// 关键词意图分析接口客户端
///
/// 封装所有与远程分析接口相关的调用逻辑
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ClientError, ConfigError};
use crate::models::analysis::{AnalysisRecord, AnalysisRequest, BatchResult};
use crate::models::batch::Batch;

/// 分析一个批次的能力
///
/// 会话控制器只依赖这个 trait，测试中可以替换为内存实现。
pub trait BatchAnalyzer: Send + Sync {
    /// 提交一个批次并返回其分析结果
    ///
    /// 传输失败或非 2xx 状态返回 `ClientError`；接口返回空数组时返回兜底结果。
    fn analyze<'a>(
        &'a self,
        batch: &'a Batch,
    ) -> BoxFuture<'a, Result<BatchResult, ClientError>>;
}

/// 基于 reqwest 的 HTTP 客户端
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    /// 按配置创建客户端；超时只在传输层生效
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let http = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self::with_client(http, config.analysis_endpoint.clone()))
    }

    /// 使用已有的 reqwest 客户端
    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// 发送一次请求，返回原始的结果数组
    pub async fn post_keywords(&self, batch: &Batch) -> Result<Vec<AnalysisRecord>, ClientError> {
        debug!(
            "POST {} (批次 {}, {} 个关键词)",
            self.endpoint,
            batch.number(),
            batch.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&AnalysisRequest {
                keywords: batch.keywords(),
            })
            .send()
            .await
            .map_err(|source| {
                warn!("分析接口请求失败: {}", source);
                ClientError::Request {
                    endpoint: self.endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("分析接口返回错误状态: {}", status);
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let records: Vec<AnalysisRecord> = response
            .json()
            .await
            .map_err(|source| ClientError::Decode { source })?;

        debug!("分析接口返回 {} 条结果", records.len());

        Ok(records)
    }
}

impl BatchAnalyzer for HttpAnalysisClient {
    fn analyze<'a>(
        &'a self,
        batch: &'a Batch,
    ) -> BoxFuture<'a, Result<BatchResult, ClientError>> {
        Box::pin(async move {
            let records = self.post_keywords(batch).await?;
            if records.is_empty() {
                warn!("批次 {} 的分析结果为空，使用兜底结果", batch.number());
            }
            Ok(BatchResult::from_records(batch, records))
        })
    }
}
