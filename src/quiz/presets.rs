use crate::quiz::version::{QuizVersion, VersionStatus};
use crate::quiz::{
    AnswerOption, ChoiceMode, Question, QuestionCategory, Quiz, QuizType, SwipeDirection,
};
use crate::types::weights::BucketWeights;

pub const DEMO_QUIZ_ID: &str = "demo";
pub const SWIPE_FORMULA_ID: &str = "swipe";

// Opposing swipes subtract from the other side of the axis.
pub fn contribution_preset(category: QuestionCategory, direction: SwipeDirection) -> BucketWeights {
    // (feeling, sensing, intuition, thinking)
    let (feeling, sensing, intuition, thinking) = match (category, direction) {
        (_, SwipeDirection::Skip) => (0.0, 0.0, 0.0, 0.0),
        (QuestionCategory::ThinkingFeeling, SwipeDirection::Left) => (-1.0, 0.0, 0.0, 2.0),
        (QuestionCategory::ThinkingFeeling, SwipeDirection::Right) => (2.0, 0.0, 0.0, -1.0),
        (QuestionCategory::ThinkingFeeling, SwipeDirection::Up) => (0.5, 0.0, 0.0, 0.5),
        (QuestionCategory::SensingIntuition, SwipeDirection::Left) => (0.0, 2.0, -1.0, 0.0),
        (QuestionCategory::SensingIntuition, SwipeDirection::Right) => (0.0, -1.0, 2.0, 0.0),
        (QuestionCategory::SensingIntuition, SwipeDirection::Up) => (0.0, 0.5, 0.5, 0.0),
        (QuestionCategory::General, SwipeDirection::Left) => (0.0, 1.0, 0.0, 1.0),
        (QuestionCategory::General, SwipeDirection::Right) => (1.0, 0.0, 1.0, 0.0),
        (QuestionCategory::General, SwipeDirection::Up) => (0.5, 0.5, 0.5, 0.5),
    };
    BucketWeights::new(feeling, sensing, intuition, thinking)
}

pub fn swipe_options(question_id: &str) -> Vec<AnswerOption> {
    [
        (SwipeDirection::Left, "Disagree"),
        (SwipeDirection::Right, "Agree"),
        (SwipeDirection::Up, "Neutral"),
    ]
    .into_iter()
    .map(|(swipe, label)| AnswerOption {
        id: format!("{question_id}-{swipe}"),
        label: label.to_string(),
        swipe,
        weights: None,
    })
    .collect()
}

pub fn swipe_question(
    id: impl Into<String>,
    text: impl Into<String>,
    category: QuestionCategory,
) -> Question {
    let id = id.into();
    Question {
        options: swipe_options(&id),
        id,
        text: text.into(),
        category,
        group_id: None,
        skip_conditions: Vec::new(),
        order: 0,
        is_active: true,
    }
}

pub fn default_questions() -> Vec<Question> {
    vec![
        swipe_question(
            "q1",
            "I prefer to make decisions based on logical analysis rather than personal values",
            QuestionCategory::ThinkingFeeling,
        ),
        swipe_question(
            "q2",
            "I focus on concrete details and facts rather than abstract possibilities",
            QuestionCategory::SensingIntuition,
        ),
        swipe_question(
            "q3",
            "I am more comfortable with established methods than trying new approaches",
            QuestionCategory::General,
        ),
        swipe_question(
            "q4",
            "I consider the impact on people when making decisions",
            QuestionCategory::ThinkingFeeling,
        ),
        swipe_question(
            "q5",
            "I enjoy brainstorming and exploring theoretical concepts",
            QuestionCategory::SensingIntuition,
        ),
    ]
}

pub fn demo_quiz() -> Quiz {
    Quiz {
        id: DEMO_QUIZ_ID.to_string(),
        title: "Communication Style Assessment".to_string(),
        description: "Five swipe questions across the thinking-feeling and sensing-intuition axes"
            .to_string(),
        quiz_type: QuizType::DeepDive,
        max_questions: None,
        choice_mode: ChoiceMode::ThreeChoice,
        formula_id: Some(SWIPE_FORMULA_ID.to_string()),
        groups: Vec::new(),
        questions: default_questions(),
        version: QuizVersion {
            status: VersionStatus::Published,
            ..QuizVersion::default()
        },
    }
}
