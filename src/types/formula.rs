use crate::types::bucket::BucketId;
use crate::types::weights::WeightDomain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const DEFAULT_FORMULA_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Average,
    Weighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMethod {
    #[default]
    Linear,
    Percentile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalization {
    pub enabled: bool,
    pub scale: [f64; 2],
    pub method: NormalizationMethod,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: [0.0, 100.0],
            method: NormalizationMethod::Linear,
        }
    }
}

impl Normalization {
    pub fn min(&self) -> f64 {
        self.scale[0]
    }

    pub fn max(&self) -> f64 {
        self.scale[1]
    }

    pub fn midpoint(&self) -> f64 {
        (self.min() + self.max()) / 2.0
    }
}

// Serialized as `fixed_top_<N>` or `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TopKMethod {
    FixedTop(usize),
    Threshold,
}

impl TryFrom<String> for TopKMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "threshold" {
            return Ok(Self::Threshold);
        }
        value
            .strip_prefix("fixed_top_")
            .and_then(|count| count.parse::<usize>().ok())
            .map(Self::FixedTop)
            .ok_or_else(|| format!("unknown top-k method: {value}"))
    }
}

impl From<TopKMethod> for String {
    fn from(method: TopKMethod) -> Self {
        method.to_string()
    }
}

impl fmt::Display for TopKMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedTop(count) => write!(f, "fixed_top_{count}"),
            Self::Threshold => f.write_str("threshold"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopKHighlight {
    pub method: TopKMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl Default for TopKHighlight {
    fn default() -> Self {
        Self {
            method: TopKMethod::FixedTop(2),
            threshold: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TieBreaking {
    pub priority: Vec<BucketId>,
}

impl Default for TieBreaking {
    fn default() -> Self {
        Self {
            priority: vec![
                BucketId::Feeling,
                BucketId::Intuition,
                BucketId::Thinking,
                BucketId::Sensing,
            ],
        }
    }
}

impl TieBreaking {
    pub fn rank_of(&self, bucket: BucketId) -> usize {
        self.priority
            .iter()
            .position(|candidate| *candidate == bucket)
            .unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringFormula {
    pub id: String,
    pub aggregation: Aggregation,
    pub normalization: Normalization,
    pub top_k_highlight: TopKHighlight,
    pub blur_non_top: bool,
    pub tie_breaking: TieBreaking,
    pub weight_domain: WeightDomain,
}

impl Default for ScoringFormula {
    fn default() -> Self {
        Self {
            id: DEFAULT_FORMULA_ID.to_string(),
            aggregation: Aggregation::Sum,
            normalization: Normalization::default(),
            top_k_highlight: TopKHighlight::default(),
            blur_non_top: true,
            tie_breaking: TieBreaking::default(),
            weight_domain: WeightDomain::Capped,
        }
    }
}

pub fn default_formula() -> ScoringFormula {
    ScoringFormula::default()
}

pub fn validate_formula(formula: &ScoringFormula) -> Vec<String> {
    let mut errors = Vec::new();

    let normalization = &formula.normalization;
    if normalization.enabled {
        if !normalization.min().is_finite() || !normalization.max().is_finite() {
            errors.push("Normalization scale bounds must be finite numbers".to_string());
        } else if normalization.min() >= normalization.max() {
            errors.push("Normalization scale minimum must be less than maximum".to_string());
        }
    }

    match formula.top_k_highlight.method {
        TopKMethod::Threshold => match formula.top_k_highlight.threshold {
            None => errors.push("Threshold method requires a threshold value".to_string()),
            Some(threshold) if !threshold.is_finite() => {
                errors.push("Threshold value must be a finite number".to_string())
            }
            Some(_) => {}
        },
        TopKMethod::FixedTop(count) => {
            if count == 0 || count > BucketId::ALL.len() {
                errors.push(format!(
                    "Fixed top-K count must be between 1 and 4 (found {count})"
                ));
            }
        }
    }

    let priority = &formula.tie_breaking.priority;
    if priority.len() != BucketId::ALL.len() {
        let missing = BucketId::ALL
            .iter()
            .filter(|bucket| !priority.contains(bucket))
            .map(|bucket| bucket.as_str())
            .collect::<Vec<_>>();
        if missing.is_empty() {
            errors.push("Tie-breaking priority must include all 4 buckets".to_string());
        } else {
            errors.push(format!(
                "Tie-breaking priority must include all 4 buckets (missing: {})",
                missing.join(", ")
            ));
        }
    }

    let mut seen = BTreeSet::new();
    let duplicates = priority
        .iter()
        .filter(|bucket| !seen.insert(**bucket))
        .map(|bucket| bucket.as_str())
        .collect::<BTreeSet<_>>();
    if !duplicates.is_empty() {
        errors.push(format!(
            "Tie-breaking priority must not have duplicate buckets (duplicated: {})",
            duplicates.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    errors
}
