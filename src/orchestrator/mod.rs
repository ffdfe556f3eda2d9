//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层持有会话状态并驱动逐批分析，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `session` - 会话状态
//! - 保存原始输入、关键词、批次、游标、结果、进度与错误信息
//! - 提供同步、无 I/O 的状态转换
//!
//! ### `session_controller` - 会话控制器
//! - 唯一的会话所有者
//! - 保证同一时刻最多一个分析请求
//! - 输出批次日志
//!
//! ### `aggregator` - 结果合并
//! - 把最新在前的结果合并为一份 Markdown
//! - 汇总 Token 用量
//!
//! ## 层次关系
//!
//! ```text
//! app (读取输入、驱动推进、写报告)
//!     ↓
//! session_controller (初始化 / 推进 / 重置)
//!     ↓
//! services (normalizer / batcher)    clients (BatchAnalyzer)
//! ```

pub mod aggregator;
pub mod session;
pub mod session_controller;

pub use aggregator::{combine_results, total_usage};
pub use session::{AdvanceStep, Session, SessionState};
pub use session_controller::{AdvanceOutcome, SessionController};
