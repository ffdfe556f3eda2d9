//! 错误类型
//!
//! 库代码返回这里定义的类型化错误，二进制入口统一用 `anyhow` 收口。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件读写错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 关键词规范化错误
///
/// `Display` 即为展示给用户的错误文本。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordError {
    /// 输入为空或只有空白
    #[error("Please enter keywords")]
    InputEmpty,
    /// 去重、过滤后没有剩余关键词
    #[error("{}", no_valid_keywords_message(*raw_count))]
    NoValidKeywords {
        /// 切分、去空白后的原始关键词数量
        raw_count: usize,
    },
}

fn no_valid_keywords_message(raw_count: usize) -> &'static str {
    if raw_count == 0 {
        "Please enter valid keywords"
    } else {
        "No valid keywords after deduplication and filtering"
    }
}

/// 分析接口调用错误（传输层失败）
#[derive(Debug, Error)]
pub enum ClientError {
    /// 网络请求失败
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非 2xx 状态码
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },
    /// 响应体无法解析
    #[error("invalid response body: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
}

/// 会话状态机错误
#[derive(Debug, Error)]
pub enum SessionError {
    /// 只有空会话可以初始化
    #[error("session is already initialized, reset it first")]
    AlreadyInitialized,
    /// 会话尚未初始化
    #[error("session is not initialized")]
    NotInitialized,
    /// 关键词规范化失败
    #[error(transparent)]
    Keywords(#[from] KeywordError),
    /// 某个批次分析失败，游标不前进
    #[error("Batch {batch_number} analysis failed: {source}")]
    BatchFailed {
        /// 从 1 开始的批次编号
        batch_number: usize,
        #[source]
        source: ClientError,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("无法解析配置文件 {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// HTTP 客户端构建失败
    #[error("无法构建 HTTP 客户端: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl AppError {
    /// 创建文件读写错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
