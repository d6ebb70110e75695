use crate::error::{QuizError, Result};
use crate::quiz::presets::{default_questions, swipe_question};
use crate::quiz::{Question, QuestionCategory};
use crate::types::bucket::BucketId;
use crate::types::scoring::ScoringResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};

pub const FALLBACK_INSIGHT: &str = "Your personality journey is unique and valuable.";
pub const MAX_REWRITES: usize = 3;
const TREND_WINDOW: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_person_role: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub existing_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitLean {
    pub bucket: BucketId,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTrend {
    pub metric: String,
    pub recent_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    Questions {
        context: QuestionContext,
        count: usize,
    },
    MessageRewrites {
        raw_input: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        situation_context: Option<String>,
        leading_traits: Vec<TraitLean>,
    },
    Insight {
        trends: Vec<MetricTrend>,
        recent_situations: Vec<String>,
    },
}

impl GenerationRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Questions { .. } => "questions",
            Self::MessageRewrites { .. } => "message_rewrites",
            Self::Insight { .. } => "insight",
        }
    }
}

// Every caller below has a fallback for failure or empty output.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl TextGenerator for Unconfigured {
    fn generate(&self, _request: &GenerationRequest) -> Result<Vec<String>> {
        Err(QuizError::Generation(
            "no text generator configured".to_string(),
        ))
    }
}

/// Request JSON goes to stdin; each non-empty stdout line is one result.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl TextGenerator for CommandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        let payload = serde_json::to_vec(request)?;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| QuizError::Generation(format!("failed to start {}: {}", self.program, e)))?;

        // The child is reaped even when it stops reading its input early.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Ok(()),
        };
        let output = child.wait_with_output()?;
        written.map_err(|e| {
            QuizError::Generation(format!("failed to write request to {}: {}", self.program, e))
        })?;
        if !output.status.success() {
            return Err(QuizError::Generation(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(non_empty_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub fn generate_questions(
    generator: &dyn TextGenerator,
    context: &QuestionContext,
    count: usize,
) -> Vec<Question> {
    let request = GenerationRequest::Questions {
        context: context.clone(),
        count,
    };
    let lines = match generator.generate(&request) {
        Ok(lines) => lines,
        Err(e) => {
            tracing::warn!(error = %e, "question generation failed; using default questions");
            return default_questions();
        }
    };

    let questions = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .take(count.max(1))
        .enumerate()
        .map(|(index, text)| {
            swipe_question(format!("generated-{index}"), text, QuestionCategory::General)
        })
        .collect::<Vec<_>>();
    if questions.is_empty() {
        tracing::warn!("question generation returned nothing; using default questions");
        return default_questions();
    }
    questions
}

pub fn leading_traits(scores: &[ScoringResult]) -> Vec<TraitLean> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.normalized_score.total_cmp(&a.normalized_score));
    sorted
        .into_iter()
        .take(2)
        .map(|result| TraitLean {
            bucket: result.bucket_id,
            score: result.normalized_score,
        })
        .collect()
}

pub fn rewrite_message(
    generator: &dyn TextGenerator,
    raw_input: &str,
    situation_context: Option<&str>,
    scores: &[ScoringResult],
) -> Vec<String> {
    let request = GenerationRequest::MessageRewrites {
        raw_input: raw_input.to_string(),
        situation_context: situation_context.map(ToString::to_string),
        leading_traits: leading_traits(scores),
    };
    let rewrites = match generator.generate(&request) {
        Ok(lines) => lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .take(MAX_REWRITES)
            .collect::<Vec<_>>(),
        Err(e) => {
            tracing::warn!(error = %e, "message rewrite failed; echoing input");
            Vec::new()
        }
    };
    if rewrites.is_empty() {
        return vec![raw_input.to_string(); MAX_REWRITES];
    }
    rewrites
}

pub fn metric_trends(history: &[MetricSample]) -> Vec<MetricTrend> {
    let mut by_metric = BTreeMap::<&str, Vec<&MetricSample>>::new();
    for sample in history {
        by_metric.entry(sample.metric.as_str()).or_default().push(sample);
    }

    by_metric
        .into_iter()
        .map(|(metric, mut samples)| {
            samples.sort_by_key(|sample| sample.recorded_at);
            let recent = &samples[samples.len().saturating_sub(TREND_WINDOW)..];
            let recent_average =
                recent.iter().map(|sample| sample.value).sum::<f64>() / recent.len() as f64;
            MetricTrend {
                metric: metric.to_string(),
                recent_average,
            }
        })
        .collect()
}

pub fn personality_insight(
    generator: &dyn TextGenerator,
    history: &[MetricSample],
    recent_situations: &[String],
) -> String {
    let request = GenerationRequest::Insight {
        trends: metric_trends(history),
        recent_situations: recent_situations.iter().take(3).cloned().collect(),
    };
    match generator.generate(&request) {
        Ok(lines) if !lines.is_empty() => lines.join("\n"),
        Ok(_) => FALLBACK_INSIGHT.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "insight generation failed");
            FALLBACK_INSIGHT.to_string()
        }
    }
}
