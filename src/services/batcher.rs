//! 批次划分 - 业务能力层

use crate::models::batch::{Batch, BatchSize};
use crate::models::keyword::KeywordSet;

/// 把关键词序列切分为连续的批次，编号从 1 开始
///
/// 批次数 = ceil(|keywords| / batch_size)，最后一批可能较小。
pub fn create_batches(keywords: &KeywordSet, batch_size: BatchSize) -> Vec<Batch> {
    keywords
        .as_slice()
        .chunks(batch_size.get())
        .enumerate()
        .map(|(idx, chunk)| Batch::new(idx + 1, chunk.to_vec()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::normalizer::normalize;

    fn keyword_set(n: usize) -> KeywordSet {
        let raw = (0..n)
            .map(|i| format!("keyword {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        normalize(&raw).unwrap().keywords
    }

    #[test]
    fn test_create_batches_sizes() {
        let batches = create_batches(&keyword_set(250), BatchSize::new(100));
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        let numbers: Vec<usize> = batches.iter().map(Batch::number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_create_batches_exact_multiple() {
        let batches = create_batches(&keyword_set(200), BatchSize::new(100));
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 100));
    }

    #[test]
    fn test_create_batches_reconstructs_order() {
        for n in [1, 7, 33, 199, 201] {
            let keywords = keyword_set(n);
            for size in [1, 3, 50, 200] {
                let batches = create_batches(&keywords, BatchSize::new(size));
                assert_eq!(batches.len(), n.div_ceil(size));
                assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= size));

                let flattened: Vec<String> =
                    batches.iter().flat_map(|b| b.to_strings()).collect();
                assert_eq!(flattened, keywords.to_strings());
            }
        }
    }

    #[test]
    fn test_create_batches_is_deterministic() {
        let keywords = keyword_set(42);
        assert_eq!(
            create_batches(&keywords, BatchSize::new(10)),
            create_batches(&keywords, BatchSize::new(10))
        );
    }
}
