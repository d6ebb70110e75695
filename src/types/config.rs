use crate::error::QuizError;
use crate::generation::{CommandGenerator, TextGenerator, Unconfigured};
use crate::types::formula::{validate_formula, ScoringFormula};
use serde::Deserialize;

pub const DEFAULT_QUESTION_COUNT: usize = 5;
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizscoreConfig {
    pub scoring: Option<ScoringFormula>,
    pub content: Option<ContentConfig>,
    pub generation: Option<GenerationConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    pub question_count: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl QuizscoreConfig {
    pub fn formula(&self) -> ScoringFormula {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn content_path(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|content| content.path.as_deref())
    }

    pub fn question_count(&self) -> usize {
        self.generation
            .as_ref()
            .and_then(|generation| generation.question_count)
            .unwrap_or(DEFAULT_QUESTION_COUNT)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging
            .as_ref()
            .and_then(|logging| logging.level.as_deref())
    }

    pub fn generator(&self) -> Box<dyn TextGenerator> {
        match &self.generation {
            Some(GenerationConfig {
                command: Some(command),
                args,
                ..
            }) => Box::new(CommandGenerator::new(command.clone(), args.clone())),
            _ => Box::new(Unconfigured),
        }
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if let Some(formula) = &self.scoring {
            let errors = validate_formula(formula);
            if !errors.is_empty() {
                return Err(QuizError::ConfigParse(format!(
                    "scoring formula is invalid: {}",
                    errors.join("; ")
                )));
            }
        }

        if let Some(generation) = &self.generation {
            if let Some(command) = &generation.command {
                if command.trim().is_empty() {
                    return Err(QuizError::ConfigParse(
                        "generation.command must be a non-empty program name".to_string(),
                    ));
                }
            }
            if generation.question_count == Some(0) {
                return Err(QuizError::ConfigParse(
                    "generation.question_count must be greater than 0".to_string(),
                ));
            }
        }

        if let Some(level) = self.log_level() {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(QuizError::ConfigParse(format!(
                    "unsupported logging.level: {level}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::formula::{Aggregation, TopKMethod};

    #[test]
    fn parse_empty_config_uses_defaults() {
        let cfg: QuizscoreConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(cfg.formula().id, "default");
        assert_eq!(cfg.question_count(), DEFAULT_QUESTION_COUNT);
        assert!(cfg.log_level().is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let cfg: QuizscoreConfig = toml::from_str(
            r#"
[scoring]
aggregation = "average"

[scoring.top_k_highlight]
method = "fixed_top_3"

[content]
path = "content/quizzes.toml"

[generation]
command = "quiz-llm"
args = ["--model", "small"]
question_count = 8

[logging]
level = "debug"
"#,
        )
        .expect("full config should parse");

        let formula = cfg.formula();
        assert_eq!(formula.aggregation, Aggregation::Average);
        assert_eq!(formula.top_k_highlight.method, TopKMethod::FixedTop(3));
        assert!(formula.normalization.enabled);
        assert_eq!(cfg.content_path(), Some("content/quizzes.toml"));
        assert_eq!(cfg.question_count(), 8);
        assert_eq!(cfg.log_level(), Some("debug"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_invalid_scoring_formula() {
        let cfg: QuizscoreConfig = toml::from_str(
            r#"
[scoring.normalization]
scale = [100, 0]
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err
            .to_string()
            .contains("Normalization scale minimum must be less than maximum"));
    }

    #[test]
    fn validate_rejects_zero_question_count() {
        let cfg: QuizscoreConfig = toml::from_str(
            r#"
[generation]
question_count = 0
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err
            .to_string()
            .contains("generation.question_count must be greater than 0"));
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let cfg: QuizscoreConfig = toml::from_str(
            r#"
[logging]
level = "loud"
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("unsupported logging.level"));
    }

    #[test]
    fn validate_rejects_blank_generation_command() {
        let cfg: QuizscoreConfig = toml::from_str(
            r#"
[generation]
command = "  "
"#,
        )
        .expect("config should parse");
        assert!(cfg.validate().is_err());
    }
}
