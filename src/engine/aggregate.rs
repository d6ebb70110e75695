use crate::types::answer::AnsweredQuestion;
use crate::types::formula::Aggregation;
use crate::types::weights::BucketWeights;

pub fn aggregate(answers: &[AnsweredQuestion], aggregation: Aggregation) -> BucketWeights {
    let mut totals = BucketWeights::ZERO;
    for answer in answers {
        let factor = match aggregation {
            Aggregation::Sum | Aggregation::Weighted => answer.effective_group_weight(),
            Aggregation::Average => 1.0,
        };
        totals.add_scaled(&answer.weights, factor);
    }

    // Divides by answer count, not by the number of non-zero contributions.
    if matches!(aggregation, Aggregation::Average) && !answers.is_empty() {
        let count = answers.len() as f64;
        totals = totals.map(|value| value / count);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::bucket::BucketId;

    fn answer(id: &str, weights: BucketWeights) -> AnsweredQuestion {
        AnsweredQuestion::new(id, format!("{id}-a"), weights)
    }

    #[test]
    fn sum_adds_each_bucket_across_answers() {
        let answers = vec![
            answer("q1", BucketWeights::ZERO.with(BucketId::Thinking, 2.0)),
            answer(
                "q2",
                BucketWeights::ZERO
                    .with(BucketId::Thinking, 3.0)
                    .with(BucketId::Feeling, 1.0),
            ),
            answer("q3", BucketWeights::ZERO),
        ];
        let totals = aggregate(&answers, Aggregation::Sum);
        assert_eq!(totals, BucketWeights::new(1.0, 0.0, 0.0, 5.0));
    }

    #[test]
    fn average_divides_by_answer_count() {
        let answers = vec![
            answer("q1", BucketWeights::ZERO.with(BucketId::Feeling, 10.0)),
            answer("q2", BucketWeights::ZERO),
        ];
        let totals = aggregate(&answers, Aggregation::Average);
        assert_eq!(totals.feeling, 5.0);
    }

    #[test]
    fn weighted_applies_group_weight() {
        let answers = vec![
            answer("q1", BucketWeights::ZERO.with(BucketId::Sensing, 2.0)).with_group_weight(1.5),
            answer("q2", BucketWeights::ZERO.with(BucketId::Sensing, 1.0)),
        ];
        assert_eq!(aggregate(&answers, Aggregation::Weighted).sensing, 4.0);
        assert_eq!(aggregate(&answers, Aggregation::Sum).sensing, 4.0);
    }

    #[test]
    fn average_ignores_group_weight() {
        let answers = vec![
            answer("q1", BucketWeights::ZERO.with(BucketId::Sensing, 4.0)).with_group_weight(3.0),
            answer("q2", BucketWeights::ZERO),
        ];
        assert_eq!(aggregate(&answers, Aggregation::Average).sensing, 2.0);
    }

    #[test]
    fn no_answers_yield_zero_totals() {
        for aggregation in [Aggregation::Sum, Aggregation::Average, Aggregation::Weighted] {
            assert_eq!(aggregate(&[], aggregation), BucketWeights::ZERO);
        }
    }
}
