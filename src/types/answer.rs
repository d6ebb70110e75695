use crate::types::weights::BucketWeights;
use serde::{Deserialize, Serialize};

pub const SKIPPED_OPTION_ID: &str = "skipped";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_id: String,
    #[serde(alias = "answer_id")]
    pub option_id: String,
    #[serde(default, alias = "bucket_weights")]
    pub weights: BucketWeights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_weight: Option<f64>,
}

impl AnsweredQuestion {
    pub fn new(
        question_id: impl Into<String>,
        option_id: impl Into<String>,
        weights: BucketWeights,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            option_id: option_id.into(),
            weights,
            group_weight: None,
        }
    }

    pub fn skipped(question_id: impl Into<String>) -> Self {
        Self::new(question_id, SKIPPED_OPTION_ID, BucketWeights::ZERO)
    }

    pub fn with_group_weight(mut self, group_weight: f64) -> Self {
        self.group_weight = Some(group_weight);
        self
    }

    // Absent, zero and non-finite group weights count as 1.
    pub fn effective_group_weight(&self) -> f64 {
        match self.group_weight {
            Some(weight) if weight != 0.0 && weight.is_finite() => weight,
            _ => 1.0,
        }
    }
}
