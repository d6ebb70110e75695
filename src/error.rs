use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("unknown bucket: {0}")]
    BucketNotFound(String),

    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    #[error("scoring formula not found: {0}")]
    FormulaNotFound(String),

    #[error("question not found: {0}")]
    QuestionNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("content parse error: {0}")]
    ContentParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("session is already complete")]
    SessionComplete,

    #[error("swipe direction not allowed in this quiz: {0}")]
    DirectionNotAllowed(String),

    #[error("question {question} has no option for direction {direction}")]
    NoOptionForDirection { question: String, direction: String },

    #[error("quiz {quiz} cannot be published: {}", .errors.join("; "))]
    PublishBlocked { quiz: String, errors: Vec<String> },

    #[error("quiz {0} version is archived")]
    VersionArchived(String),

    #[error("text generation failed: {0}")]
    Generation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
