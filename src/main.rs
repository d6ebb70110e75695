mod cli;

use clap::Parser;
use quizscore::config;
use quizscore::engine::ScoringEngine;
use quizscore::error::QuizError;
use quizscore::generation::{self, MetricSample, QuestionContext};
use quizscore::logging;
use quizscore::quiz::session::QuizSession;
use quizscore::quiz::{validate_quiz, Quiz};
use quizscore::report;
use quizscore::store::{InMemoryStore, QuizStore};
use quizscore::types::answer::AnsweredQuestion;
use quizscore::types::bucket;
use quizscore::types::config::QuizscoreConfig;
use quizscore::types::formula::{validate_formula, ScoringFormula};
use quizscore::types::report::ScoreReport;
use quizscore::types::weights::{normalize_weights, BucketWeights, WeightDomain};
use serde::de::DeserializeOwned;
use std::path::Path;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const BLOCKING: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn run() -> Result<i32, QuizError> {
    let cli = cli::Cli::parse();
    if !cli.dir.exists() {
        return Err(QuizError::PathNotFound(cli.dir.display().to_string()));
    }

    let loaded = config::load_config(&cli.dir)?;
    let cfg = loaded.unwrap_or_default();
    logging::init(cli.verbose, cli.quiet, cfg.log_level());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), dir = %cli.dir.display(), "quizscore starting");

    match cli.command {
        cli::Commands::Buckets(cmd) => {
            match cmd.format {
                cli::ReportFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(bucket::all())?);
                }
                cli::ReportFormat::Md => {
                    for bucket in bucket::all() {
                        println!(
                            "- {} ({}) {}: {}",
                            bucket.name, bucket.id, bucket.color, bucket.description
                        );
                    }
                }
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Score(cmd) => {
            let answers: Vec<AnsweredQuestion> = read_json(&cmd.answers)?;
            let formula = match &cmd.formula {
                Some(path) => config::load_formula(path)?,
                None => cfg.formula(),
            };

            let mut warnings = validate_formula(&formula);
            for answer in &answers {
                if !formula.weight_domain.validate(&answer.weights) {
                    warnings.push(format!(
                        "answer to {} has weights outside the {} domain (total {:.1})",
                        answer.question_id,
                        formula.weight_domain,
                        answer.weights.total()
                    ));
                }
            }

            let results = ScoringEngine::new().calculate_scores(&answers, &formula);
            let score_report =
                ScoreReport::new(None, &formula, answers.len(), results).with_warnings(warnings);
            println!("{}", report::render(&score_report, output_format(cmd.format))?);

            if score_report.warnings.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::WARNINGS)
            }
        }
        cli::Commands::Validate(cmd) => {
            let store = InMemoryStore::load(&cmd.content)?;
            let errors = content_errors(&store, &cfg);
            if errors.is_empty() {
                println!("validate: no errors");
                return Ok(exit_code::SUCCESS);
            }
            for error in &errors {
                println!("[ERROR] {error}");
            }
            Ok(exit_code::BLOCKING)
        }
        cli::Commands::Weights(cmd) => {
            let weights =
                BucketWeights::new(cmd.feeling, cmd.sensing, cmd.intuition, cmd.thinking);
            let domain = WeightDomain::from(cmd.domain);
            print_weights("weights", &weights);
            if cmd.normalize {
                print_weights("normalized", &normalize_weights(&weights));
            }

            if domain.validate(&weights) {
                println!("valid ({domain})");
                Ok(exit_code::SUCCESS)
            } else {
                println!("invalid ({domain})");
                Ok(exit_code::BLOCKING)
            }
        }
        cli::Commands::Take(cmd) => {
            let store = open_store(cmd.content.as_deref(), &cfg, &cli.dir)?;
            let quiz = store.quiz(&cmd.quiz_id)?;
            let formula = resolve_formula(&store, quiz, &cfg)?;

            let mut warnings = validate_quiz(quiz, &formula);
            if !quiz.version.is_published() {
                warnings.push(format!(
                    "quiz {} version {} is {}, not published",
                    quiz.id, quiz.version.number, quiz.version.status
                ));
            }
            let mut session = QuizSession::new(quiz, &formula);
            for swipe in cmd.swipes {
                session.answer(swipe.into())?;
            }
            let (answered, total) = session.progress();
            if !session.is_complete() {
                warnings.push(format!("quiz incomplete: answered {answered} of {total}"));
            }

            let score_report = session.report().with_warnings(warnings);
            println!("{}", report::render(&score_report, output_format(cmd.format))?);

            if score_report.warnings.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::WARNINGS)
            }
        }
        cli::Commands::Generate(cmd) => {
            let context = QuestionContext {
                situation_context: cmd.situation,
                goal: cmd.goal,
                tone_preference: cmd.tone,
                other_person_role: cmd.role,
                existing_questions: Vec::new(),
            };
            let count = cmd.count.unwrap_or_else(|| cfg.question_count());
            let generator = cfg.generator();
            for question in generation::generate_questions(generator.as_ref(), &context, count) {
                println!("- [{}] {}", question.id, question.text);
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Rewrite(cmd) => {
            let answers: Vec<AnsweredQuestion> = match &cmd.answers {
                Some(path) => read_json(path)?,
                None => Vec::new(),
            };
            let scores = ScoringEngine::new().calculate_scores(&answers, &cfg.formula());
            let generator = cfg.generator();
            for rewrite in generation::rewrite_message(
                generator.as_ref(),
                &cmd.message,
                cmd.situation.as_deref(),
                &scores,
            ) {
                println!("{rewrite}");
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Insight(cmd) => {
            let history: Vec<MetricSample> = read_json(&cmd.history)?;
            let generator = cfg.generator();
            println!(
                "{}",
                generation::personality_insight(generator.as_ref(), &history, &cmd.situations)
            );
            Ok(exit_code::SUCCESS)
        }
    }
}

fn output_format(format: cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, QuizError> {
    if !path.exists() {
        return Err(QuizError::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_weights(label: &str, weights: &BucketWeights) {
    let entries = weights
        .iter()
        .map(|(bucket, value)| format!("{bucket}={value:.1}"))
        .collect::<Vec<_>>();
    println!("{label}: {} (total {:.1})", entries.join(" "), weights.total());
}

fn open_store(
    content: Option<&Path>,
    cfg: &QuizscoreConfig,
    dir: &Path,
) -> Result<InMemoryStore, QuizError> {
    let path = content
        .map(Path::to_path_buf)
        .or_else(|| cfg.content_path().map(|path| dir.join(path)));
    match path {
        Some(path) => InMemoryStore::load(&path),
        None => Ok(InMemoryStore::with_builtins()),
    }
}

/// A quiz's named formula wins; otherwise the configured `[scoring]` table,
/// then the built-in default.
fn resolve_formula(
    store: &InMemoryStore,
    quiz: &Quiz,
    cfg: &QuizscoreConfig,
) -> Result<ScoringFormula, QuizError> {
    match (&quiz.formula_id, &cfg.scoring) {
        (None, Some(formula)) => Ok(formula.clone()),
        _ => store.formula_for(quiz).cloned(),
    }
}

fn content_errors(store: &InMemoryStore, cfg: &QuizscoreConfig) -> Vec<String> {
    let mut errors = Vec::new();
    for formula in store.formulas() {
        errors.extend(
            validate_formula(formula)
                .into_iter()
                .map(|error| format!("formula {}: {}", formula.id, error)),
        );
    }
    for quiz in store.quizzes() {
        match resolve_formula(store, quiz, cfg) {
            Ok(formula) => errors.extend(
                validate_quiz(quiz, &formula)
                    .into_iter()
                    .map(|error| format!("quiz {}: {}", quiz.id, error)),
            ),
            Err(e) => errors.push(format!("quiz {}: {}", quiz.id, e)),
        }
    }
    errors
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
