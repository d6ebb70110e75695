use clap::{Args, Parser, Subcommand, ValueEnum};
use quizscore::quiz::SwipeDirection;
use quizscore::types::weights::WeightDomain;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quizscore",
    version,
    about = "Personality quiz scoring engine and CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding quizscore.toml
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the bucket catalogue
    Buckets(BucketsCommand),
    /// Score a JSON list of answered questions
    Score(ScoreCommand),
    /// Check formulas and quizzes in a content file
    Validate(ValidateCommand),
    /// Validate or normalize a single weight vector
    Weights(WeightsCommand),
    /// Run a quiz with a scripted list of swipes
    Take(TakeCommand),
    /// Generate situation-specific questions
    Generate(GenerateCommand),
    /// Suggest rewrites of a message
    Rewrite(RewriteCommand),
    /// Summarize a history of metric samples
    Insight(InsightCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Swipe {
    Left,
    Right,
    Up,
    Skip,
}

impl From<Swipe> for SwipeDirection {
    fn from(swipe: Swipe) -> Self {
        match swipe {
            Swipe::Left => SwipeDirection::Left,
            Swipe::Right => SwipeDirection::Right,
            Swipe::Up => SwipeDirection::Up,
            Swipe::Skip => SwipeDirection::Skip,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Domain {
    Capped,
    Signed,
}

impl From<Domain> for WeightDomain {
    fn from(domain: Domain) -> Self {
        match domain {
            Domain::Capped => WeightDomain::Capped,
            Domain::Signed => WeightDomain::Signed,
        }
    }
}

#[derive(Args)]
pub struct BucketsCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ScoreCommand {
    /// JSON array of answered questions
    pub answers: PathBuf,
    /// TOML scoring formula; defaults to the configured one
    #[arg(long)]
    pub formula: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ValidateCommand {
    pub content: PathBuf,
}

#[derive(Args)]
pub struct WeightsCommand {
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub feeling: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub sensing: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub intuition: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub thinking: f64,
    /// Also print the weights rescaled to the cap
    #[arg(long)]
    pub normalize: bool,
    #[arg(long, value_enum, default_value = "capped")]
    pub domain: Domain,
}

#[derive(Args)]
pub struct TakeCommand {
    pub quiz_id: String,
    #[arg(long, value_enum, value_delimiter = ',', required = true)]
    pub swipes: Vec<Swipe>,
    /// TOML content file; defaults to `[content].path` from config
    #[arg(long)]
    pub content: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct GenerateCommand {
    #[arg(long)]
    pub count: Option<usize>,
    #[arg(long)]
    pub situation: Option<String>,
    #[arg(long)]
    pub goal: Option<String>,
    #[arg(long)]
    pub tone: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Args)]
pub struct RewriteCommand {
    pub message: String,
    #[arg(long)]
    pub situation: Option<String>,
    /// JSON answers used to lean the rewrites toward the user's traits
    #[arg(long)]
    pub answers: Option<PathBuf>,
}

#[derive(Args)]
pub struct InsightCommand {
    /// JSON array of metric samples
    pub history: PathBuf,
    #[arg(long = "situation")]
    pub situations: Vec<String>,
}
