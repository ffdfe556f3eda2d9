//! # Keyword Intent
//!
//! 关键词意图批量分析：把大量无结构的关键词整理、分批，逐批提交给远程分析接口，
//! 并逐步汇总结果。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - `Keyword` / `KeywordSet` / `Batch` / `BatchResult` 及接口报文
//!
//! ### ② 业务能力层（Services）
//! - `normalizer` - 切分、去重、过滤纯数字
//! - `batcher` - 按批次大小切分
//!
//! ### ③ 基础设施层（Clients）
//! - `BatchAnalyzer` - 分析一个批次的能力
//! - `HttpAnalysisClient` - 基于 reqwest 的实现
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session_controller` - 会话状态机，保证最多一个请求在处理中
//! - `orchestrator/aggregator` - 合并结果为 Markdown 报告
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use clients::{BatchAnalyzer, HttpAnalysisClient};
pub use config::Config;
pub use error::{AppError, AppResult, ClientError, KeywordError, SessionError};
pub use models::{Batch, BatchResult, BatchSize, Keyword, KeywordSet, TokenUsage};
pub use orchestrator::{AdvanceOutcome, Session, SessionController, SessionState};
