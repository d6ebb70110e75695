use crate::types::bucket::BucketId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub bucket_id: BucketId,
    pub bucket_name: String,
    pub raw_score: f64,
    pub normalized_score: f64,
    pub rank: usize,
    pub is_top_k: bool,
    pub color: String,
}

pub fn top_buckets(results: &[ScoringResult]) -> Vec<BucketId> {
    results
        .iter()
        .filter(|result| result.is_top_k)
        .map(|result| result.bucket_id)
        .collect()
}
