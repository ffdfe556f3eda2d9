use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::batch::BatchSize;

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "KEYWORD_INTENT_CONFIG";
/// 默认配置文件路径（不存在时跳过）
pub const DEFAULT_CONFIG_PATH: &str = "keyword_intent.toml";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 远程分析接口地址
    pub analysis_endpoint: String,
    /// 每批关键词数量，会话初始化后固定
    pub batch_size: BatchSize,
    /// 请求超时（秒），0 表示不限
    pub request_timeout_secs: u64,
    /// 关键词输入文件，未设置时从标准输入读取
    pub input_file: Option<String>,
    /// 合并后的分析报告输出文件
    pub report_file: String,
    /// 是否自动逐批处理
    pub auto_advance: bool,
    /// 自动处理时两批之间的间隔（毫秒）
    pub auto_advance_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis_endpoint: "https://analyze-user-intents-with-keywords.gengliming110.workers.dev"
                .to_string(),
            batch_size: BatchSize::default(),
            request_timeout_secs: 120,
            input_file: None,
            report_file: "intent_report.md".to_string(),
            auto_advance: false,
            auto_advance_delay_ms: 1000,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    analysis_endpoint: Option<String>,
    batch_size: Option<i64>,
    request_timeout_secs: Option<u64>,
    input_file: Option<String>,
    report_file: Option<String>,
    auto_advance: Option<bool>,
    auto_advance_delay_ms: Option<u64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 加载配置：默认值 → 配置文件（可选）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };
        Ok(base.with_env())
    }

    /// 从 TOML 文件加载，未出现的字段使用默认值
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            analysis_endpoint: file.analysis_endpoint.unwrap_or(default.analysis_endpoint),
            batch_size: file.batch_size.map(BatchSize::from_i64).unwrap_or(default.batch_size),
            request_timeout_secs: file.request_timeout_secs.unwrap_or(default.request_timeout_secs),
            input_file: file.input_file.or(default.input_file),
            report_file: file.report_file.unwrap_or(default.report_file),
            auto_advance: file.auto_advance.unwrap_or(default.auto_advance),
            auto_advance_delay_ms: file.auto_advance_delay_ms.unwrap_or(default.auto_advance_delay_ms),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env(self) -> Self {
        Self {
            analysis_endpoint: std::env::var("ANALYSIS_ENDPOINT").unwrap_or(self.analysis_endpoint),
            batch_size: std::env::var("BATCH_SIZE").map(|v| BatchSize::parse(&v)).unwrap_or(self.batch_size),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            input_file: std::env::var("INPUT_FILE").ok().or(self.input_file),
            report_file: std::env::var("REPORT_FILE").unwrap_or(self.report_file),
            auto_advance: std::env::var("AUTO_ADVANCE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.auto_advance),
            auto_advance_delay_ms: std::env::var("AUTO_ADVANCE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.auto_advance_delay_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }
}
