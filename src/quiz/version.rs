use crate::error::{QuizError, Result};
use crate::quiz::{validate_quiz, Quiz};
use crate::types::formula::{validate_formula, ScoringFormula};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INITIAL_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Published => f.write_str("published"),
            Self::Archived => f.write_str("archived"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizVersion {
    #[serde(default = "initial_version")]
    pub number: String,
    #[serde(default)]
    pub status: VersionStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub change_log: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

fn initial_version() -> String {
    INITIAL_VERSION.to_string()
}

impl Default for QuizVersion {
    fn default() -> Self {
        Self {
            number: initial_version(),
            status: VersionStatus::Draft,
            change_log: String::new(),
            created_by: None,
            published_at: None,
        }
    }
}

impl QuizVersion {
    pub fn is_published(&self) -> bool {
        self.status == VersionStatus::Published
    }
}

/// Formula and quiz errors that block publishing, formula errors first.
pub fn publish_errors(quiz: &Quiz, formula: &ScoringFormula) -> Vec<String> {
    let mut errors = validate_formula(formula)
        .into_iter()
        .map(|error| format!("formula {}: {}", formula.id, error))
        .collect::<Vec<_>>();
    errors.extend(validate_quiz(quiz, formula));
    errors
}

pub fn publish(quiz: &mut Quiz, formula: &ScoringFormula) -> Result<()> {
    if quiz.version.status == VersionStatus::Archived {
        return Err(QuizError::VersionArchived(quiz.id.clone()));
    }
    let errors = publish_errors(quiz, formula);
    if !errors.is_empty() {
        return Err(QuizError::PublishBlocked {
            quiz: quiz.id.clone(),
            errors,
        });
    }

    quiz.version.status = VersionStatus::Published;
    quiz.version.published_at = Some(Utc::now());
    tracing::info!(
        quiz = %quiz.id,
        version = %quiz.version.number,
        formula = %formula.id,
        "published quiz version"
    );
    Ok(())
}

pub fn archive(quiz: &mut Quiz) {
    quiz.version.status = VersionStatus::Archived;
}
