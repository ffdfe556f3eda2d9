//! 会话状态 - 编排层
//!
//! `Session` 是一次分析任务的全部可变状态。这里的转换函数都是同步、无 I/O 的，
//! 真正的异步调用和互斥边界在 `session_controller` 中。

use crate::error::{ClientError, SessionError};
use crate::models::analysis::BatchResult;
use crate::models::batch::{Batch, BatchSize};
use crate::models::keyword::KeywordSet;
use crate::services::{batcher, normalizer};

/// 会话状态标签，由游标和批次数推导
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 尚未初始化
    Empty,
    /// 已完成规范化和分批，游标为 0
    Initialized,
    /// 至少完成一个批次，仍有剩余
    InProgress,
    /// 所有批次均已完成
    Completed,
}

/// `begin_advance` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceStep {
    /// 提交该批次
    Submit(Batch),
    /// 已全部完成，无需提交
    AllComplete,
    /// 已有批次在处理中
    Busy,
}

/// 一次分析任务的会话
#[derive(Debug, Clone, Default)]
pub struct Session {
    raw_input: String,
    batch_size: BatchSize,
    raw_count: usize,
    keywords: KeywordSet,
    batches: Vec<Batch>,
    cursor: usize,
    /// 最新结果在前
    results: Vec<BatchResult>,
    progress: Option<String>,
    error: Option<String>,
    loading: bool,
    /// 每次重置递增，用于丢弃重置前发出的请求结果
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.batches.is_empty() {
            SessionState::Empty
        } else if self.cursor == 0 {
            SessionState::Initialized
        } else if self.cursor < self.batches.len() {
            SessionState::InProgress
        } else {
            SessionState::Completed
        }
    }

    /// 规范化并分批，只允许在 `Empty` 状态调用
    ///
    /// 失败时状态不变，错误信息写入 `error`（替换旧的错误）。
    pub fn initialize(
        &mut self,
        raw_text: &str,
        batch_size: BatchSize,
    ) -> Result<(), SessionError> {
        if self.state() != SessionState::Empty {
            self.error = Some(SessionError::AlreadyInitialized.to_string());
            return Err(SessionError::AlreadyInitialized);
        }

        self.raw_input = raw_text.to_string();
        self.error = None;
        self.progress = None;
        self.results.clear();

        let normalized = match normalizer::normalize(raw_text) {
            Ok(normalized) => normalized,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let batches = batcher::create_batches(&normalized.keywords, batch_size);

        self.progress = Some(format!(
            "Processed {} keywords, {} valid keywords remaining after deduplication and filtering, divided into {} batches.",
            normalized.raw_count,
            normalized.keywords.len(),
            batches.len()
        ));
        self.batch_size = batch_size;
        self.raw_count = normalized.raw_count;
        self.keywords = normalized.keywords;
        self.batches = batches;
        self.cursor = 0;

        Ok(())
    }

    /// 准备提交游标处的批次，成功时置 `loading`
    pub fn begin_advance(&mut self) -> Result<AdvanceStep, SessionError> {
        if self.state() == SessionState::Empty {
            self.error = Some(SessionError::NotInitialized.to_string());
            return Err(SessionError::NotInitialized);
        }
        if self.cursor >= self.batches.len() {
            self.progress = Some("All batches completed!".to_string());
            return Ok(AdvanceStep::AllComplete);
        }
        if self.loading {
            return Ok(AdvanceStep::Busy);
        }

        let batch = self.batches[self.cursor].clone();
        self.loading = true;
        self.error = None;
        self.progress = Some(format!(
            "Analyzing batch {}/{} keywords ({} items)...",
            batch.number(),
            self.batches.len(),
            batch.len()
        ));

        Ok(AdvanceStep::Submit(batch))
    }

    /// 记录成功结果：结果放在最前，游标前进，返回完成的批次编号
    pub fn complete_advance(&mut self, result: BatchResult) -> usize {
        let batch_number = self.cursor + 1;
        self.results.insert(0, result);
        self.cursor += 1;
        self.loading = false;

        self.progress = Some(if self.cursor >= self.batches.len() {
            format!(
                "Analysis completed! Processed {} keywords in {} batches.",
                self.keywords.len(),
                self.batches.len()
            )
        } else {
            format!(
                "Batch {} completed, process the next batch to continue.",
                batch_number
            )
        });

        batch_number
    }

    /// 记录失败：游标不动，再次推进会重新提交同一批次
    pub fn fail_advance(&mut self, source: ClientError) -> SessionError {
        let err = SessionError::BatchFailed {
            batch_number: self.cursor + 1,
            source,
        };
        self.loading = false;
        self.error = Some(err.to_string());
        err
    }

    /// 清空所有字段，回到 `Empty`
    pub fn reset(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn batch_size(&self) -> BatchSize {
        self.batch_size
    }

    pub fn raw_count(&self) -> usize {
        self.raw_count
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 最新结果在前
    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 下一步操作的提示文字
    pub fn next_action_label(&self) -> String {
        match self.state() {
            SessionState::Empty => "Start Analysis".to_string(),
            SessionState::Completed => "All Complete".to_string(),
            _ => format!("Process Batch {}", self.cursor + 1),
        }
    }
}
