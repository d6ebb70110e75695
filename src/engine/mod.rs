pub mod aggregate;
pub mod normalize;
pub mod rank;

use crate::types::answer::AnsweredQuestion;
use crate::types::bucket::{self, Bucket};
use crate::types::formula::ScoringFormula;
use crate::types::scoring::ScoringResult;
use crate::types::weights::BucketWeights;

#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    buckets: &'static [Bucket; 4],
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            buckets: bucket::all(),
        }
    }

    // Never fails; an invalid formula degrades instead of erroring.
    pub fn calculate_scores(
        &self,
        answers: &[AnsweredQuestion],
        formula: &ScoringFormula,
    ) -> Vec<ScoringResult> {
        let raw = aggregate::aggregate(answers, formula.aggregation);
        let scores = if formula.normalization.enabled {
            normalize::normalize(&raw, &formula.normalization)
        } else {
            raw
        };
        tracing::debug!(
            formula = %formula.id,
            answers = answers.len(),
            ?raw,
            ?scores,
            "aggregated bucket totals"
        );

        let ranked = rank::rank_and_highlight(
            self.buckets.as_slice(),
            &raw,
            &scores,
            &formula.top_k_highlight,
        );
        rank::apply_tie_breaking(ranked, &formula.tie_breaking)
    }

    pub fn preview_scoring(
        &self,
        weight_sets: &[BucketWeights],
        formula: &ScoringFormula,
    ) -> Vec<ScoringResult> {
        let answers = weight_sets
            .iter()
            .enumerate()
            .map(|(index, weights)| {
                AnsweredQuestion::new(format!("test-q{index}"), format!("test-a{index}"), *weights)
            })
            .collect::<Vec<_>>();
        self.calculate_scores(&answers, formula)
    }
}

pub fn calculate_scores(answers: &[AnsweredQuestion], formula: &ScoringFormula) -> Vec<ScoringResult> {
    ScoringEngine::new().calculate_scores(answers, formula)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::bucket::BucketId;
    use crate::types::formula::{
        default_formula, Aggregation, NormalizationMethod, TopKHighlight, TopKMethod,
    };

    fn result_for(results: &[ScoringResult], bucket: BucketId) -> &ScoringResult {
        results
            .iter()
            .find(|result| result.bucket_id == bucket)
            .expect("every bucket should be scored")
    }

    #[test]
    fn empty_answers_score_midpoint_for_every_bucket() {
        let results = calculate_scores(&[], &default_formula());
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|result| result.raw_score == 0.0));
        assert!(results.iter().all(|result| result.normalized_score == 50.0));
        let order = results.iter().map(|result| result.bucket_id).collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                BucketId::Feeling,
                BucketId::Intuition,
                BucketId::Thinking,
                BucketId::Sensing
            ]
        );
    }

    #[test]
    fn empty_answers_without_normalization_stay_zero() {
        let mut formula = default_formula();
        formula.normalization.enabled = false;
        let results = calculate_scores(&[], &formula);
        assert!(results.iter().all(|result| result.normalized_score == 0.0));
    }

    #[test]
    fn sum_scores_keep_raw_totals_alongside_normalized() {
        let answers = vec![
            AnsweredQuestion::new("q1", "a", BucketWeights::ZERO.with(BucketId::Thinking, 2.0)),
            AnsweredQuestion::new(
                "q2",
                "a",
                BucketWeights::ZERO
                    .with(BucketId::Thinking, 3.0)
                    .with(BucketId::Feeling, 1.0),
            ),
            AnsweredQuestion::new("q3", "a", BucketWeights::ZERO),
        ];
        let results = calculate_scores(&answers, &default_formula());

        let thinking = result_for(&results, BucketId::Thinking);
        assert_eq!(thinking.raw_score, 5.0);
        assert_eq!(thinking.normalized_score, 100.0);
        assert_eq!(thinking.rank, 1);
        assert!(thinking.is_top_k);

        let feeling = result_for(&results, BucketId::Feeling);
        assert_eq!(feeling.raw_score, 1.0);
        assert_eq!(feeling.normalized_score, 20.0);
        assert_eq!(feeling.rank, 2);

        let sensing = result_for(&results, BucketId::Sensing);
        assert_eq!(sensing.raw_score, 0.0);
        // intuition and sensing tie at zero; intuition wins on priority
        assert_eq!(result_for(&results, BucketId::Intuition).rank, 3);
        assert_eq!(sensing.rank, 4);
    }

    #[test]
    fn unvalidated_huge_weights_rank_by_score() {
        let mut formula = default_formula();
        formula.normalization.enabled = false;
        let answers = vec![AnsweredQuestion::new(
            "q1",
            "a",
            BucketWeights::new(1e306, 0.0, 0.0, 2e306),
        )];
        let results = calculate_scores(&answers, &formula);
        assert_eq!(result_for(&results, BucketId::Thinking).rank, 1);
        assert_eq!(result_for(&results, BucketId::Feeling).rank, 2);
    }

    #[test]
    fn average_scores_by_answer_count() {
        let mut formula = default_formula();
        formula.aggregation = Aggregation::Average;
        formula.normalization.enabled = false;
        let answers = vec![
            AnsweredQuestion::new("q1", "a", BucketWeights::ZERO.with(BucketId::Feeling, 10.0)),
            AnsweredQuestion::new("q2", "a", BucketWeights::ZERO),
        ];
        let results = calculate_scores(&answers, &formula);
        assert_eq!(result_for(&results, BucketId::Feeling).normalized_score, 5.0);
    }

    #[test]
    fn threshold_highlights_independently_of_rank() {
        let mut formula = default_formula();
        formula.top_k_highlight = TopKHighlight {
            method: TopKMethod::Threshold,
            threshold: Some(101.0),
        };
        let answers = vec![AnsweredQuestion::new(
            "q1",
            "a",
            BucketWeights::new(1.0, 2.0, 3.0, 4.0),
        )];
        let results = calculate_scores(&answers, &formula);
        assert!(results.iter().all(|result| !result.is_top_k));
    }

    #[test]
    fn percentile_normalization_is_selectable() {
        let mut formula = default_formula();
        formula.normalization.method = NormalizationMethod::Percentile;
        let answers = vec![AnsweredQuestion::new(
            "q1",
            "a",
            BucketWeights::new(9.0, 0.0, 1.0, 0.5),
        )];
        let results = calculate_scores(&answers, &formula);
        assert_eq!(result_for(&results, BucketId::Feeling).normalized_score, 100.0);
        assert_eq!(result_for(&results, BucketId::Sensing).normalized_score, 0.0);
    }

    #[test]
    fn preview_scoring_matches_direct_scoring() {
        let formula = default_formula();
        let weights = vec![
            BucketWeights::ZERO.with(BucketId::Sensing, 4.0),
            BucketWeights::ZERO.with(BucketId::Intuition, 2.0),
        ];
        let engine = ScoringEngine::new();
        let preview = engine.preview_scoring(&weights, &formula);
        assert_eq!(preview[0].bucket_id, BucketId::Sensing);
        assert_eq!(preview[1].bucket_id, BucketId::Intuition);
        assert_eq!(preview[0].raw_score, 4.0);
    }

    #[test]
    fn identical_input_scores_identically() {
        let formula = default_formula();
        let answers = vec![AnsweredQuestion::new(
            "q1",
            "a",
            BucketWeights::new(3.0, 1.0, 3.0, 1.0),
        )];
        let first = calculate_scores(&answers, &formula);
        for _ in 0..10 {
            assert_eq!(calculate_scores(&answers, &formula), first);
        }
        assert_eq!(first[0].bucket_id, BucketId::Feeling);
        assert_eq!(first[1].bucket_id, BucketId::Intuition);
    }
}
