use crate::types::bucket::Bucket;
use crate::types::formula::{TieBreaking, TopKHighlight, TopKMethod};
use crate::types::scoring::ScoringResult;
use crate::types::weights::BucketWeights;
use std::cmp::Ordering;

// Scores closer than this are treated as tied.
const TIE_GRANULARITY: f64 = 1000.0;

pub fn rank_and_highlight(
    buckets: &[Bucket],
    raw: &BucketWeights,
    scores: &BucketWeights,
    top_k: &TopKHighlight,
) -> Vec<ScoringResult> {
    let mut results = buckets
        .iter()
        .map(|bucket| ScoringResult {
            bucket_id: bucket.id,
            bucket_name: bucket.name.to_string(),
            raw_score: raw.get(bucket.id),
            normalized_score: scores.get(bucket.id),
            rank: 0,
            is_top_k: false,
            color: bucket.color.to_string(),
        })
        .collect::<Vec<_>>();

    results.sort_by(|a, b| descending(a.normalized_score, b.normalized_score));
    assign_ranks(&mut results);

    match top_k.method {
        TopKMethod::FixedTop(count) => {
            for result in results.iter_mut().take(count) {
                result.is_top_k = true;
            }
        }
        TopKMethod::Threshold => {
            if let Some(threshold) = top_k.threshold {
                for result in results.iter_mut() {
                    result.is_top_k = result.normalized_score >= threshold;
                }
            }
        }
    }

    results
}

// Top-K marks are carried through unchanged, so after a reorder they can
// disagree with rank.
pub fn apply_tie_breaking(
    mut results: Vec<ScoringResult>,
    tie_breaking: &TieBreaking,
) -> Vec<ScoringResult> {
    results.sort_by(|a, b| {
        let (key_a, key_b) = (tie_key(a.normalized_score), tie_key(b.normalized_score));
        // Keys overflow for scores near f64::MAX; fall back to the scores.
        let by_score = if key_a.is_finite() && key_b.is_finite() {
            descending(key_a, key_b)
        } else {
            descending(a.normalized_score, b.normalized_score)
        };
        by_score.then_with(|| {
            tie_breaking
                .rank_of(a.bucket_id)
                .cmp(&tie_breaking.rank_of(b.bucket_id))
        })
    });
    assign_ranks(&mut results);
    results
}

fn tie_key(score: f64) -> f64 {
    (score * TIE_GRANULARITY).round() / TIE_GRANULARITY
}

// Adding 0.0 folds -0.0 into 0.0 so both compare equal under total_cmp.
fn descending(a: f64, b: f64) -> Ordering {
    (b + 0.0).total_cmp(&(a + 0.0))
}

fn assign_ranks(results: &mut [ScoringResult]) {
    for (index, result) in results.iter_mut().enumerate() {
        result.rank = index + 1;
    }
}
