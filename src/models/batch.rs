//! 批次模型

use crate::models::keyword::Keyword;
use std::fmt;

/// 一个批次：有序、非空、大小不超过批次上限
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    number: usize,
    keywords: Vec<Keyword>,
}

impl Batch {
    pub(crate) fn new(number: usize, keywords: Vec<Keyword>) -> Self {
        Self { number, keywords }
    }

    /// 批次编号（从 1 开始，按创建顺序）
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.to_string()).collect()
    }
}

/// 批次大小配置，始终落在 `MIN..=MAX` 内
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchSize(usize);

impl BatchSize {
    pub const MIN: usize = 1;
    pub const MAX: usize = 200;
    pub const DEFAULT: usize = 100;

    /// 超出范围的值被钳制到边界；0 视为无效，回落到默认值
    pub fn new(value: usize) -> Self {
        if value == 0 {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// 从有符号整数构造：0 回落到默认值，负数取下限
    pub fn from_i64(value: i64) -> Self {
        match value {
            0 => Self::default(),
            v if v < 0 => Self(Self::MIN),
            v => Self::new(usize::try_from(v).unwrap_or(Self::MAX)),
        }
    }

    /// 解析用户输入，非数字或 0 回落到默认值
    pub fn parse(input: &str) -> Self {
        input
            .trim()
            .parse::<i64>()
            .map(Self::from_i64)
            .unwrap_or_default()
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
