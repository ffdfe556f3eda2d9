//! 会话控制器 - 编排层
//!
//! ## 职责
//!
//! 唯一持有 `Session` 的模块，负责：
//! 1. 初始化：规范化 + 分批
//! 2. 逐批推进：每次调用最多发出一个分析请求
//! 3. 重置：回到空会话
//!
//! ## 并发约束
//!
//! - `session` 锁只在同步转换期间持有，不跨越 await
//! - `in_flight` 锁在分析请求期间持有，`try_lock` 失败即视为忙碌
//! - 重置后旧请求仍持有 `in_flight`，其结果按 generation 丢弃

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::clients::BatchAnalyzer;
use crate::error::SessionError;
use crate::models::analysis::TokenUsage;
use crate::models::batch::BatchSize;
use crate::orchestrator::aggregator;
use crate::orchestrator::session::{AdvanceStep, Session};
use crate::utils::logging;

/// `advance_batch` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// 一个批次分析完成
    BatchCompleted {
        /// 从 1 开始的批次编号
        batch_number: usize,
        /// 是否为最后一批
        finished: bool,
    },
    /// 所有批次已完成，本次调用未发出请求
    AllComplete,
    /// 已有请求在处理中，本次调用被忽略
    Busy,
    /// 请求期间会话被重置，结果已丢弃
    Discarded,
}

/// 会话控制器
pub struct SessionController<A> {
    analyzer: A,
    session: Mutex<Session>,
    in_flight: Mutex<()>,
}

impl<A: BatchAnalyzer> SessionController<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            session: Mutex::new(Session::new()),
            in_flight: Mutex::new(()),
        }
    }

    /// 初始化会话，只允许在空会话上调用
    pub async fn initialize(
        &self,
        raw_text: &str,
        batch_size: BatchSize,
    ) -> Result<Session, SessionError> {
        let mut session = self.session.lock().await;

        if let Err(e) = session.initialize(raw_text, batch_size) {
            warn!("⚠️ 会话初始化失败: {}", e);
            return Err(e);
        }

        logging::log_session_initialized(
            session.raw_count(),
            session.keywords().len(),
            session.batch_count(),
        );

        Ok(session.clone())
    }

    /// 分析游标处的批次
    ///
    /// 成功时结果插入最前、游标前进；失败时游标不动，错误写入会话。
    pub async fn advance_batch(&self) -> Result<AdvanceOutcome, SessionError> {
        let (batch, generation, total_batches, _permit) = {
            let mut session = self.session.lock().await;

            let Ok(permit) = self.in_flight.try_lock() else {
                debug!("已有批次在处理中，忽略本次推进");
                return Ok(AdvanceOutcome::Busy);
            };

            match session.begin_advance()? {
                AdvanceStep::Submit(batch) => {
                    (batch, session.generation(), session.batch_count(), permit)
                }
                AdvanceStep::AllComplete => {
                    info!("✅ 所有批次均已完成");
                    return Ok(AdvanceOutcome::AllComplete);
                }
                AdvanceStep::Busy => return Ok(AdvanceOutcome::Busy),
            }
        };

        logging::log_batch_start(batch.number(), total_batches, batch.len());

        let outcome = self.analyzer.analyze(&batch).await;

        let mut session = self.session.lock().await;
        if session.generation() != generation {
            warn!("会话已重置，丢弃第 {} 批的分析结果", batch.number());
            return Ok(AdvanceOutcome::Discarded);
        }

        match outcome {
            Ok(result) => {
                let degraded = result.is_degraded();
                let batch_number = session.complete_advance(result);
                logging::log_batch_complete(batch_number, total_batches, degraded);
                Ok(AdvanceOutcome::BatchCompleted {
                    batch_number,
                    finished: batch_number == total_batches,
                })
            }
            Err(e) => {
                let err = session.fail_advance(e);
                error!("❌ {}", err);
                Err(err)
            }
        }
    }

    /// 清空会话，任何时候都可以调用
    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        session.reset();
        info!("🔄 会话已重置");
    }

    /// 当前会话的快照
    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// 合并后的分析报告（最新批次在前）
    pub async fn combined_report(&self) -> String {
        aggregator::combine_results(self.session.lock().await.results())
    }

    /// 所有结果的 Token 用量汇总
    pub async fn total_usage(&self) -> Option<TokenUsage> {
        aggregator::total_usage(self.session.lock().await.results())
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::models::analysis::BatchResult;
    use crate::models::batch::Batch;
    use crate::orchestrator::session::SessionState;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    /// 记录并发峰值的分析器
    #[derive(Default)]
    struct SlowAnalyzer {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl BatchAnalyzer for SlowAnalyzer {
        fn analyze<'a>(
            &'a self,
            batch: &'a Batch,
        ) -> BoxFuture<'a, Result<BatchResult, ClientError>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(BatchResult {
                    inputs: batch.to_strings(),
                    analysis: format!("batch {}", batch.number()),
                    usage: None,
                    degraded: false,
                })
            })
        }
    }

    #[tokio::test]
    async fn test_concurrent_advances_issue_one_call() {
        let controller = SessionController::new(SlowAnalyzer::default());
        assert_ok!(controller.initialize("a, b, c", BatchSize::new(1)).await);

        let outcomes = futures::future::join_all((0..5).map(|_| controller.advance_batch())).await;

        let completed = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(AdvanceOutcome::BatchCompleted { .. })))
            .count();
        let busy = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(AdvanceOutcome::Busy)))
            .count();
        assert_eq!(completed, 1);
        assert_eq!(busy, 4);
        assert_eq!(controller.analyzer().calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.analyzer().peak.load(Ordering::SeqCst), 1);
        assert_eq!(controller.snapshot().await.cursor(), 1);
    }

    #[tokio::test]
    async fn test_advance_before_initialize() {
        let controller = SessionController::new(SlowAnalyzer::default());
        let err = assert_err!(controller.advance_batch().await);
        assert!(matches!(err, SessionError::NotInitialized));

        let session = controller.snapshot().await;
        assert_eq!(session.error(), Some("session is not initialized"));
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(controller.analyzer().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reset_during_call_discards_result() {
        let controller = SessionController::new(SlowAnalyzer::default());
        assert_ok!(controller.initialize("a, b", BatchSize::new(1)).await);

        let (first, during) = tokio::join!(controller.advance_batch(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.reset().await;
            assert_ok!(controller.initialize("x, y, z", BatchSize::new(2)).await);
            // 旧请求仍在处理中
            controller.advance_batch().await
        });

        assert_eq!(first.unwrap(), AdvanceOutcome::Discarded);
        assert_eq!(during.unwrap(), AdvanceOutcome::Busy);

        let session = controller.snapshot().await;
        assert_eq!(session.state(), SessionState::Initialized);
        assert!(!session.has_results());
        assert_eq!(session.keywords().to_strings(), vec!["x", "y", "z"]);

        let outcome = controller.advance_batch().await.unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::BatchCompleted {
                batch_number: 1,
                finished: false
            }
        );
        assert_eq!(controller.analyzer().peak.load(Ordering::SeqCst), 1);
    }
}
