use crate::types::bucket::BucketId;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const WEIGHT_CAP: f64 = 10.0;

// Absorbs float noise when one-decimal weights are summed against the cap.
const CAP_TOLERANCE: f64 = 1e-9;

// Missing keys deserialize as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketWeights {
    pub feeling: f64,
    pub sensing: f64,
    pub intuition: f64,
    pub thinking: f64,
}

impl BucketWeights {
    pub const ZERO: Self = Self {
        feeling: 0.0,
        sensing: 0.0,
        intuition: 0.0,
        thinking: 0.0,
    };

    pub fn new(feeling: f64, sensing: f64, intuition: f64, thinking: f64) -> Self {
        Self {
            feeling,
            sensing,
            intuition,
            thinking,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn get(&self, bucket: BucketId) -> f64 {
        match bucket {
            BucketId::Feeling => self.feeling,
            BucketId::Sensing => self.sensing,
            BucketId::Intuition => self.intuition,
            BucketId::Thinking => self.thinking,
        }
    }

    pub fn set(&mut self, bucket: BucketId, value: f64) {
        match bucket {
            BucketId::Feeling => self.feeling = value,
            BucketId::Sensing => self.sensing = value,
            BucketId::Intuition => self.intuition = value,
            BucketId::Thinking => self.thinking = value,
        }
    }

    pub fn with(mut self, bucket: BucketId, value: f64) -> Self {
        self.set(bucket, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (BucketId, f64)> + '_ {
        BucketId::ALL.into_iter().map(|bucket| (bucket, self.get(bucket)))
    }

    pub fn total(&self) -> f64 {
        self.feeling + self.sensing + self.intuition + self.thinking
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.feeling), f(self.sensing), f(self.intuition), f(self.thinking))
    }

    pub fn add_scaled(&mut self, other: &BucketWeights, factor: f64) {
        for bucket in BucketId::ALL {
            let value = self.get(bucket) + other.get(bucket) * factor;
            self.set(bucket, value);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightDomain {
    #[default]
    Capped,
    Signed,
}

impl WeightDomain {
    pub fn validate(self, weights: &BucketWeights) -> bool {
        match self {
            Self::Capped => validate_weights(weights),
            Self::Signed => weights.iter().all(|(_, value)| value.is_finite()),
        }
    }
}

impl fmt::Display for WeightDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capped => f.write_str("capped"),
            Self::Signed => f.write_str("signed"),
        }
    }
}

pub fn validate_weights(weights: &BucketWeights) -> bool {
    weights.iter().all(|(_, value)| value >= 0.0) && weights.total() <= WEIGHT_CAP + CAP_TOLERANCE
}

// A zero-sum input comes back unchanged.
pub fn normalize_weights(weights: &BucketWeights) -> BucketWeights {
    let total = weights.total();
    if total == 0.0 || !total.is_finite() {
        return *weights;
    }
    let factor = WEIGHT_CAP / total;
    weights.map(|value| (value * factor * 10.0).round() / 10.0)
}
