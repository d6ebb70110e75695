use crate::error::{QuizError, Result};
use crate::quiz::presets::{demo_quiz, SWIPE_FORMULA_ID};
use crate::quiz::{version, Question, Quiz};
use crate::types::formula::{default_formula, ScoringFormula, DEFAULT_FORMULA_ID};
use crate::types::weights::WeightDomain;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub trait QuizStore {
    fn quiz(&self, id: &str) -> Result<&Quiz>;

    fn formula(&self, id: &str) -> Result<&ScoringFormula>;

    fn question(&self, quiz_id: &str, question_id: &str) -> Result<&Question> {
        self.quiz(quiz_id)?
            .questions
            .iter()
            .find(|question| question.id == question_id)
            .ok_or_else(|| QuizError::QuestionNotFound(format!("{quiz_id}/{question_id}")))
    }

    fn formula_for(&self, quiz: &Quiz) -> Result<&ScoringFormula> {
        self.formula(quiz.formula_id.as_deref().unwrap_or(DEFAULT_FORMULA_ID))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    #[serde(default)]
    pub formulas: Vec<ScoringFormula>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    quizzes: BTreeMap<String, Quiz>,
    formulas: BTreeMap<String, ScoringFormula>,
}

impl InMemoryStore {
    pub fn with_builtins() -> Self {
        let mut store = Self::default();
        store.insert_formula(default_formula());
        store.insert_formula(ScoringFormula {
            id: SWIPE_FORMULA_ID.to_string(),
            weight_domain: WeightDomain::Signed,
            ..default_formula()
        });
        store.insert_quiz(demo_quiz());
        store
    }

    // Same ids replace builtins.
    pub fn from_content(content: ContentFile) -> Self {
        let mut store = Self::with_builtins();
        for formula in content.formulas {
            store.insert_formula(formula);
        }
        for quiz in content.quizzes {
            store.insert_quiz(quiz);
        }
        store
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let content: ContentFile =
            toml::from_str(content).map_err(|e| QuizError::ContentParse(e.to_string()))?;
        Ok(Self::from_content(content))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(QuizError::PathNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_toml_str(&content).map_err(|e| match e {
            QuizError::ContentParse(message) => {
                QuizError::ContentParse(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            quizzes = store.quizzes.len(),
            formulas = store.formulas.len(),
            "loaded quiz content"
        );
        Ok(store)
    }

    pub fn publish(&mut self, quiz_id: &str) -> Result<()> {
        let formula = self.formula_for(self.quiz(quiz_id)?)?.clone();
        let quiz = self
            .quizzes
            .get_mut(quiz_id)
            .ok_or_else(|| QuizError::QuizNotFound(quiz_id.to_string()))?;
        version::publish(quiz, &formula)
    }

    pub fn insert_quiz(&mut self, quiz: Quiz) {
        self.quizzes.insert(quiz.id.clone(), quiz);
    }

    pub fn insert_formula(&mut self, formula: ScoringFormula) {
        self.formulas.insert(formula.id.clone(), formula);
    }

    pub fn quizzes(&self) -> impl Iterator<Item = &Quiz> {
        self.quizzes.values()
    }

    pub fn formulas(&self) -> impl Iterator<Item = &ScoringFormula> {
        self.formulas.values()
    }
}

impl QuizStore for InMemoryStore {
    fn quiz(&self, id: &str) -> Result<&Quiz> {
        self.quizzes
            .get(id)
            .ok_or_else(|| QuizError::QuizNotFound(id.to_string()))
    }

    fn formula(&self, id: &str) -> Result<&ScoringFormula> {
        self.formulas
            .get(id)
            .ok_or_else(|| QuizError::FormulaNotFound(id.to_string()))
    }
}
