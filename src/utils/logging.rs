/// 日志工具模块
///
/// 提供日志初始化、报告文件写入和格式化输出的辅助函数
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};
use crate::models::analysis::TokenUsage;

/// 初始化 tracing 订阅者
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`。重复调用无副作用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 写入分析报告（带时间戳的标题 + 合并后的 Markdown）
///
/// # 参数
/// - `report_path`: 报告文件路径
/// - `combined`: 合并后的分析文本
pub async fn write_report(report_path: &str, combined: &str) -> AppResult<()> {
    let content = format!(
        "<!-- 关键词意图分析报告 - {} -->\n\n{}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        combined
    );

    if let Some(parent) = Path::new(report_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file(report_path, e))?;
        }
    }

    tokio::fs::write(report_path, content)
        .await
        .map_err(|e| AppError::file(report_path, e))
}

/// 记录程序启动信息
pub fn log_startup(endpoint: &str, batch_size: usize, auto_advance: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 关键词意图批量分析");
    info!("🌐 分析接口: {}", endpoint);
    info!("📊 每批关键词数: {}", batch_size);
    info!(
        "⚙️ 处理模式: {}",
        if auto_advance { "自动逐批" } else { "手动逐批" }
    );
    info!("{}", "=".repeat(60));
}

/// 记录会话初始化信息
///
/// # 参数
/// - `raw_count`: 原始关键词数量
/// - `valid_count`: 去重过滤后的关键词数量
/// - `batch_count`: 批次总数
pub fn log_session_initialized(raw_count: usize, valid_count: usize, batch_count: usize) {
    info!("✓ 读取到 {} 个关键词，去重过滤后剩余 {} 个", raw_count, valid_count);
    info!("📋 共分为 {} 批，每次只处理一批", batch_count);
}

/// 记录批次开始信息
pub fn log_batch_start(batch_num: usize, total_batches: usize, size: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始分析第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批关键词: {} 个", size);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, total_batches: usize, degraded: bool) {
    info!("\n{}", "─".repeat(60));
    if degraded {
        info!("⚠️ 第 {}/{} 批完成，但接口未返回分析结果", batch_num, total_batches);
    } else {
        info!("✓ 第 {}/{} 批完成", batch_num, total_batches);
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `keyword_count`: 已处理的关键词数量
/// - `batch_count`: 批次总数
/// - `usage`: Token 用量汇总
/// - `report_path`: 报告文件路径
pub fn print_final_stats(
    keyword_count: usize,
    batch_count: usize,
    usage: Option<TokenUsage>,
    report_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部分析完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 关键词: {} 个 / 批次: {} 批", keyword_count, batch_count);
    if let Some(usage) = usage {
        info!(
            "🔢 Token 用量: prompt {} / completion {} / total {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
