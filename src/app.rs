//! 应用入口 - 驱动层
//!
//! 读取关键词、驱动会话控制器逐批推进、写出合并报告。
//! 自动模式和交互模式都只通过 `advance_batch` 推进，共用同一个并发保护。

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::clients::{BatchAnalyzer, HttpAnalysisClient};
use crate::config::Config;
use crate::orchestrator::{AdvanceOutcome, Session, SessionController};
use crate::utils::logging;

/// 从标准输入读取关键词时，单独一行的该标记表示关键词输入结束
pub const INPUT_TERMINATOR: &str = ".";

/// 交互命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Next,
    Reset,
    Status,
    Quit,
    Unknown,
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Command::Next,
            "r" | "reset" => Command::Reset,
            "s" | "status" => Command::Status,
            "q" | "quit" | "exit" => Command::Quit,
            _ => Command::Unknown,
        }
    }
}

/// 应用主结构
pub struct App<A = HttpAnalysisClient> {
    config: Config,
    controller: SessionController<A>,
}

impl App<HttpAnalysisClient> {
    /// 初始化应用（使用 HTTP 分析客户端）
    pub fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(
            &config.analysis_endpoint,
            config.batch_size.get(),
            config.auto_advance,
        );

        let client = HttpAnalysisClient::new(&config).context("无法创建分析接口客户端")?;
        Ok(Self::with_analyzer(config, client))
    }
}

impl<A: BatchAnalyzer> App<A> {
    pub fn with_analyzer(config: Config, analyzer: A) -> Self {
        Self {
            config,
            controller: SessionController::new(analyzer),
        }
    }

    pub fn controller(&self) -> &SessionController<A> {
        &self.controller
    }

    /// 运行应用主逻辑
    ///
    /// 未配置输入文件时从标准输入读取关键词，直到 EOF 或单独一行 `.`；
    /// 交互模式下其后的行作为命令。
    pub async fn run(&self) -> Result<()> {
        let mut stdin = BufReader::new(tokio::io::stdin());
        let raw_text = self.read_keywords(&mut stdin).await?;

        if !self.start(&raw_text).await {
            return Ok(());
        }

        if self.config.auto_advance {
            self.run_auto().await
        } else {
            self.run_interactive(stdin).await
        }
    }

    /// 读取关键词原始文本
    async fn read_keywords<R: AsyncBufRead + Unpin>(&self, stdin: &mut R) -> Result<String> {
        if let Some(path) = &self.config.input_file {
            info!("\n📁 正在读取关键词文件: {}", path);
            return tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("无法读取关键词文件: {}", path));
        }

        info!("⌨️ 请输入关键词（逗号或换行分隔），单独一行 `{}` 结束", INPUT_TERMINATOR);
        if self.config.auto_advance {
            let mut raw = String::new();
            stdin.read_to_string(&mut raw).await?;
            return Ok(raw);
        }

        let mut raw = String::new();
        let mut lines = stdin.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim() == INPUT_TERMINATOR {
                break;
            }
            raw.push_str(&line);
            raw.push('\n');
        }
        Ok(raw)
    }

    /// 初始化会话，失败时记录错误并返回 `false`
    pub async fn start(&self, raw_text: &str) -> bool {
        match self
            .controller
            .initialize(raw_text, self.config.batch_size)
            .await
        {
            Ok(session) => {
                log_status(&session);
                true
            }
            Err(e) => {
                error!("❌ {}", e);
                false
            }
        }
    }

    /// 自动逐批处理，直到全部完成或第一次失败
    pub async fn run_auto(&self) -> Result<()> {
        let delay = Duration::from_millis(self.config.auto_advance_delay_ms);

        loop {
            match self.process_next().await? {
                Some(AdvanceOutcome::BatchCompleted { finished: false, .. })
                | Some(AdvanceOutcome::Busy) => {
                    tokio::time::sleep(delay).await;
                }
                Some(AdvanceOutcome::BatchCompleted { finished: true, .. })
                | Some(AdvanceOutcome::AllComplete) => break,
                Some(AdvanceOutcome::Discarded) => {
                    warn!("会话已重置，停止自动处理");
                    return Ok(());
                }
                None => {
                    warn!("⚠️ 自动处理已停止，可重新运行以重试失败的批次");
                    return Ok(());
                }
            }
        }

        self.finish().await;
        Ok(())
    }

    /// 交互模式：从输入流读取命令
    pub async fn run_interactive<R: AsyncBufRead + Unpin>(&self, input: R) -> Result<()> {
        info!("💡 命令: 回车/n = 处理下一批, r = 重新开始, s = 查看状态, q = 退出");

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Command::Next => {
                    if let Some(AdvanceOutcome::BatchCompleted { finished: true, .. }) =
                        self.process_next().await?
                    {
                        self.finish().await;
                    }
                }
                Command::Reset => {
                    let raw_text = self.controller.snapshot().await.raw_input().to_string();
                    self.controller.reset().await;
                    self.start(&raw_text).await;
                }
                Command::Status => log_status(&self.controller.snapshot().await),
                Command::Quit => break,
                Command::Unknown => warn!("未知命令: {}", line.trim()),
            }
        }

        Ok(())
    }

    /// 推进一批，成功后写出报告；批次失败时返回 `None`
    async fn process_next(&self) -> Result<Option<AdvanceOutcome>> {
        match self.controller.advance_batch().await {
            Ok(outcome) => {
                if let AdvanceOutcome::BatchCompleted { .. } = outcome {
                    let combined = self.controller.combined_report().await;
                    debug!("合并报告预览: {}", logging::truncate_text(&combined, 120));
                    logging::write_report(&self.config.report_file, &combined).await?;
                }
                let session = self.controller.snapshot().await;
                if let Some(progress) = session.progress() {
                    info!("{}", progress);
                }
                Ok(Some(outcome))
            }
            Err(e) => {
                debug!("批次失败: {:?}", e);
                Ok(None)
            }
        }
    }

    async fn finish(&self) {
        let session = self.controller.snapshot().await;
        logging::print_final_stats(
            session.keywords().len(),
            session.batch_count(),
            self.controller.total_usage().await,
            &self.config.report_file,
        );
    }
}

/// 输出会话概况
fn log_status(session: &Session) {
    info!(
        "📊 有效关键词: {} | 每批: {} | 批次: {} | 已完成: {} | 下一步: {}",
        session.keywords().len(),
        session.batch_size(),
        session.batch_count(),
        session.cursor(),
        session.next_action_label()
    );
    if let Some(progress) = session.progress() {
        info!("{}", progress);
    }
    if let Some(err) = session.error() {
        warn!("⚠️ {}", err);
    }
}
