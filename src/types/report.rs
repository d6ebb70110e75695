use crate::types::formula::ScoringFormula;
use crate::types::scoring::ScoringResult;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub quiz_id: Option<String>,
    pub formula_id: String,
    pub generated_at: String,
    pub answer_count: usize,
    pub blur_non_top: bool,
    pub results: Vec<ScoringResult>,
    pub warnings: Vec<String>,
}

impl ScoreReport {
    pub fn new(
        quiz_id: Option<String>,
        formula: &ScoringFormula,
        answer_count: usize,
        results: Vec<ScoringResult>,
    ) -> Self {
        Self {
            quiz_id,
            formula_id: formula.id.clone(),
            generated_at: Utc::now().to_rfc3339(),
            answer_count,
            blur_non_top: formula.blur_non_top,
            results,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}
