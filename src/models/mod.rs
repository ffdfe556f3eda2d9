pub mod analysis;
pub mod batch;
pub mod keyword;

pub use analysis::{AnalysisPayload, AnalysisRecord, AnalysisRequest, BatchResult, TokenUsage};
pub use batch::{Batch, BatchSize};
pub use keyword::{Keyword, KeywordSet};
