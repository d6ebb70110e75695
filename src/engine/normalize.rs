use crate::types::bucket::BucketId;
use crate::types::formula::{Normalization, NormalizationMethod};
use crate::types::weights::BucketWeights;

pub fn normalize(totals: &BucketWeights, normalization: &Normalization) -> BucketWeights {
    let raw_min = totals.iter().map(|(_, value)| value).fold(f64::INFINITY, f64::min);
    let raw_max = totals
        .iter()
        .map(|(_, value)| value)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = raw_max - raw_min;

    if range == 0.0 || !range.is_finite() {
        return BucketWeights::uniform(normalization.midpoint());
    }

    let (min, max) = (normalization.min(), normalization.max());
    match normalization.method {
        NormalizationMethod::Linear => {
            totals.map(|value| min + (value - raw_min) / range * (max - min))
        }
        NormalizationMethod::Percentile => {
            let last = (BucketId::ALL.len() - 1) as f64;
            totals.map(|value| {
                let below = totals.iter().filter(|(_, other)| *other < value).count() as f64;
                min + below / last * (max - min)
            })
        }
    }
}
