pub mod presets;
pub mod session;
pub mod version;

use crate::types::answer::SKIPPED_OPTION_ID;
use crate::types::formula::ScoringFormula;
use crate::types::weights::BucketWeights;
use version::QuizVersion;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Skip,
}

impl SwipeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    ThinkingFeeling,
    SensingIntuition,
    #[default]
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceMode {
    TwoChoice,
    #[default]
    ThreeChoice,
}

impl ChoiceMode {
    pub fn allows(self, direction: SwipeDirection) -> bool {
        !matches!((self, direction), (Self::TwoChoice, SwipeDirection::Up))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    QuickOnboarding,
    #[default]
    DeepDive,
}

impl QuizType {
    pub fn default_max_questions(self) -> usize {
        match self {
            Self::QuickOnboarding => 4,
            Self::DeepDive => 100,
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuickOnboarding => f.write_str("quick_onboarding"),
            Self::DeepDive => f.write_str("deep_dive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub label: String,
    pub swipe: SwipeDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<BucketWeights>,
}

impl AnswerOption {
    pub fn resolved_weights(&self, category: QuestionCategory) -> BucketWeights {
        self.weights
            .unwrap_or_else(|| presets::contribution_preset(category, self.swipe))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipCondition {
    pub if_answer_id: String,
    // When absent the next question is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_to_question_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub category: QuestionCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip_conditions: Vec<SkipCondition>,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Question {
    pub fn option_for(&self, direction: SwipeDirection) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.swipe == direction)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quiz_type: QuizType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_questions: Option<usize>,
    #[serde(default)]
    pub choice_mode: ChoiceMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula_id: Option<String>,
    #[serde(default)]
    pub groups: Vec<QuestionGroup>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub version: QuizVersion,
}

impl Quiz {
    pub fn group_weight(&self, question: &Question) -> Option<f64> {
        let group_id = question.group_id.as_ref()?;
        self.groups
            .iter()
            .find(|group| &group.id == group_id)
            .map(|group| group.weight)
    }

    pub fn max_questions(&self) -> usize {
        self.max_questions
            .unwrap_or_else(|| self.quiz_type.default_max_questions())
    }

    // Stable, so equal `order` values keep authoring order.
    pub fn active_questions(&self) -> Vec<&Question> {
        let mut active = self
            .questions
            .iter()
            .filter(|question| question.is_active)
            .collect::<Vec<_>>();
        active.sort_by_key(|question| question.order);
        active
    }
}

pub fn validate_quiz(quiz: &Quiz, formula: &ScoringFormula) -> Vec<String> {
    let mut errors = Vec::new();

    let active = quiz.active_questions().len();
    if quiz.questions.is_empty() {
        errors.push(format!("quiz {} has no questions", quiz.id));
    } else if active == 0 {
        errors.push(format!("quiz {} has no active questions", quiz.id));
    }
    if quiz.max_questions == Some(0) {
        errors.push(format!("quiz {} max_questions must be at least 1", quiz.id));
    } else if active > quiz.max_questions() {
        errors.push(format!(
            "quiz {} has {} active questions; {} quizzes allow at most {}",
            quiz.id,
            active,
            quiz.quiz_type,
            quiz.max_questions()
        ));
    }

    let mut groups = HashMap::new();
    for group in &quiz.groups {
        if groups.insert(group.id.as_str(), group).is_some() {
            errors.push(format!("quiz {} has duplicate group id {}", quiz.id, group.id));
        }
        if !(group.weight.is_finite() && group.weight > 0.0) {
            errors.push(format!(
                "group {} weight must be a positive number (found {})",
                group.id, group.weight
            ));
        }
    }

    let question_ids = quiz
        .questions
        .iter()
        .map(|question| (question.id.as_str(), question.is_active))
        .collect::<HashMap<_, _>>();
    let mut seen_questions = HashSet::new();

    for question in &quiz.questions {
        if !seen_questions.insert(question.id.as_str()) {
            errors.push(format!("duplicate question id: {}", question.id));
        }
        if question.options.is_empty() {
            errors.push(format!("question {} has no answer options", question.id));
        }
        if let Some(group_id) = &question.group_id {
            if !groups.contains_key(group_id.as_str()) {
                errors.push(format!(
                    "question {} references unknown group {}",
                    question.id, group_id
                ));
            }
        }

        let mut directions = HashSet::new();
        for option in &question.options {
            if option.swipe == SwipeDirection::Skip {
                errors.push(format!(
                    "question {} option {} cannot be bound to skip",
                    question.id, option.id
                ));
            } else if !directions.insert(option.swipe) {
                errors.push(format!(
                    "question {} has more than one option for {}",
                    question.id, option.swipe
                ));
            }
            if !quiz.choice_mode.allows(option.swipe) {
                errors.push(format!(
                    "question {} option {} uses up in a two-choice quiz",
                    question.id, option.id
                ));
            }

            let weights = option.resolved_weights(question.category);
            if !formula.weight_domain.validate(&weights) {
                errors.push(format!(
                    "question {} option {} has weights outside the {} domain (total {:.1})",
                    question.id,
                    option.id,
                    formula.weight_domain,
                    weights.total()
                ));
            }
        }

        for condition in &question.skip_conditions {
            if condition.if_answer_id != SKIPPED_OPTION_ID
                && !question
                    .options
                    .iter()
                    .any(|option| option.id == condition.if_answer_id)
            {
                errors.push(format!(
                    "question {} skip condition references unknown answer {}",
                    question.id, condition.if_answer_id
                ));
            }
            if let Some(target) = &condition.skip_to_question_id {
                match question_ids.get(target.as_str()).copied() {
                    None => errors.push(format!(
                        "question {} skip condition targets unknown question {}",
                        question.id, target
                    )),
                    Some(false) => errors.push(format!(
                        "question {} skip condition targets inactive question {}",
                        question.id, target
                    )),
                    Some(true) => {}
                }
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::formula::default_formula;
    use crate::types::weights::WeightDomain;

    fn quiz_from(toml_str: &str) -> Quiz {
        toml::from_str(toml_str).expect("quiz should parse")
    }

    fn signed_formula() -> ScoringFormula {
        ScoringFormula {
            weight_domain: WeightDomain::Signed,
            ..default_formula()
        }
    }

    #[test]
    fn parses_quiz_with_groups_and_authored_weights() {
        let quiz = quiz_from(
            r#"
id = "deep"
title = "Deep Dive"
choice_mode = "two_choice"

[[groups]]
id = "fears"
name = "Fears"
weight = 1.5

[[questions]]
id = "q1"
text = "I plan ahead"
group_id = "fears"

[[questions.options]]
id = "q1-left"
label = "No"
swipe = "left"
weights = { intuition = 4 }

[[questions.options]]
id = "q1-right"
label = "Yes"
swipe = "right"
weights = { sensing = 6, thinking = 2 }
"#,
        );
        assert_eq!(quiz.choice_mode, ChoiceMode::TwoChoice);
        assert_eq!(quiz.group_weight(&quiz.questions[0]), Some(1.5));
        let right = quiz.questions[0]
            .option_for(SwipeDirection::Right)
            .expect("right option should exist");
        assert_eq!(
            right.resolved_weights(QuestionCategory::General),
            BucketWeights::new(0.0, 6.0, 0.0, 2.0)
        );
        assert!(validate_quiz(&quiz, &default_formula()).is_empty());
    }

    #[test]
    fn presets_fail_capped_domain_but_pass_signed() {
        let quiz = presets::demo_quiz();
        assert!(!validate_quiz(&quiz, &default_formula()).is_empty());
        assert!(validate_quiz(&quiz, &signed_formula()).is_empty());
    }

    #[test]
    fn validate_reports_broken_references() {
        let quiz = quiz_from(
            r#"
id = "broken"
title = "Broken"
choice_mode = "two_choice"

[[questions]]
id = "q1"
text = "One"
group_id = "missing"
skip_conditions = [{ if_answer_id = "q1-nope", skip_to_question_id = "q9" }]

[[questions.options]]
id = "q1-up"
label = "Neutral"
swipe = "up"

[[questions]]
id = "q1"
text = "Duplicate"
"#,
        );
        let errors = validate_quiz(&quiz, &signed_formula());
        let joined = errors.join("\n");
        assert!(joined.contains("unknown group missing"));
        assert!(joined.contains("unknown answer q1-nope"));
        assert!(joined.contains("unknown question q9"));
        assert!(joined.contains("uses up in a two-choice quiz"));
        assert!(joined.contains("duplicate question id: q1"));
        assert!(joined.contains("question q1 has no answer options"));
    }

    #[test]
    fn validate_rejects_over_cap_authored_weights() {
        let quiz = quiz_from(
            r#"
id = "heavy"
title = "Heavy"

[[questions]]
id = "q1"
text = "Too much"

[[questions.options]]
id = "q1-left"
label = "All in"
swipe = "left"
weights = { feeling = 6, sensing = 5 }
"#,
        );
        let errors = validate_quiz(&quiz, &default_formula());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("outside the capped domain (total 11.0)"));
    }

    #[test]
    fn quick_onboarding_allows_four_active_questions() {
        let mut quiz = presets::demo_quiz();
        quiz.quiz_type = QuizType::QuickOnboarding;
        let errors = validate_quiz(&quiz, &signed_formula());
        assert_eq!(
            errors,
            vec!["quiz demo has 5 active questions; quick_onboarding quizzes allow at most 4"
                .to_string()]
        );

        quiz.questions[4].is_active = false;
        assert!(validate_quiz(&quiz, &signed_formula()).is_empty());
    }

    #[test]
    fn explicit_max_questions_overrides_quiz_type() {
        let mut quiz = presets::demo_quiz();
        quiz.max_questions = Some(3);
        let errors = validate_quiz(&quiz, &signed_formula());
        assert!(errors[0].contains("has 5 active questions; deep_dive quizzes allow at most 3"));
        assert_eq!(QuizType::DeepDive.default_max_questions(), 100);
    }

    #[test]
    fn parses_order_activity_and_type() {
        let quiz = quiz_from(
            r#"
id = "quick"
title = "Quick"
quiz_type = "quick_onboarding"

[version]
number = "2.1.0"
status = "published"

[[questions]]
id = "late"
text = "Second"
order = 2

[[questions]]
id = "early"
text = "First"
order = 1

[[questions]]
id = "hidden"
text = "Retired"
is_active = false
"#,
        );
        assert_eq!(quiz.quiz_type, QuizType::QuickOnboarding);
        assert_eq!(quiz.max_questions(), 4);
        assert!(quiz.version.is_published());
        let active = quiz
            .active_questions()
            .into_iter()
            .map(|question| question.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(active, vec!["early", "late"]);
    }

    #[test]
    fn all_inactive_questions_is_an_error() {
        let mut quiz = presets::demo_quiz();
        for question in &mut quiz.questions {
            question.is_active = false;
        }
        let errors = validate_quiz(&quiz, &signed_formula());
        assert_eq!(errors, vec!["quiz demo has no active questions".to_string()]);
    }

    #[test]
    fn skip_conditions_accept_skipped_answer_and_reject_inactive_targets() {
        let mut quiz = presets::demo_quiz();
        quiz.questions[3].is_active = false;
        quiz.questions[0].skip_conditions = vec![SkipCondition {
            if_answer_id: SKIPPED_OPTION_ID.to_string(),
            skip_to_question_id: Some("q4".to_string()),
        }];
        let errors = validate_quiz(&quiz, &signed_formula());
        assert_eq!(
            errors,
            vec!["question q1 skip condition targets inactive question q4".to_string()]
        );
    }

    #[test]
    fn two_choice_mode_disallows_up() {
        assert!(!ChoiceMode::TwoChoice.allows(SwipeDirection::Up));
        assert!(ChoiceMode::TwoChoice.allows(SwipeDirection::Skip));
        assert!(ChoiceMode::ThreeChoice.allows(SwipeDirection::Up));
    }
}
