pub mod batcher;
pub mod normalizer;

pub use batcher::create_batches;
pub use normalizer::{normalize, Normalized};
