use crate::engine::ScoringEngine;
use crate::error::{QuizError, Result};
use crate::quiz::{Question, Quiz, SwipeDirection};
use crate::types::answer::AnsweredQuestion;
use crate::types::formula::ScoringFormula;
use crate::types::report::ScoreReport;
use crate::types::scoring::ScoringResult;

#[derive(Debug, Clone)]
pub struct SessionStep {
    pub answered: AnsweredQuestion,
    pub scores: Vec<ScoringResult>,
    pub next_question_id: Option<String>,
}

impl SessionStep {
    pub fn is_complete(&self) -> bool {
        self.next_question_id.is_none()
    }
}

// Answers live only as long as the session; the full list is re-scored
// after every answer.
#[derive(Debug)]
pub struct QuizSession<'a> {
    quiz: &'a Quiz,
    formula: &'a ScoringFormula,
    engine: ScoringEngine,
    sequence: Vec<&'a Question>,
    position: Option<usize>,
    answers: Vec<AnsweredQuestion>,
    scores: Vec<ScoringResult>,
}

impl<'a> QuizSession<'a> {
    pub fn new(quiz: &'a Quiz, formula: &'a ScoringFormula) -> Self {
        let engine = ScoringEngine::new();
        let scores = engine.calculate_scores(&[], formula);
        let sequence = quiz.active_questions();
        Self {
            quiz,
            formula,
            engine,
            position: if sequence.is_empty() { None } else { Some(0) },
            sequence,
            answers: Vec::new(),
            scores,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        self.quiz
    }

    pub fn current_question(&self) -> Option<&'a Question> {
        self.position.map(|index| self.sequence[index])
    }

    pub fn is_complete(&self) -> bool {
        self.position.is_none()
    }

    // (answered, active questions)
    pub fn progress(&self) -> (usize, usize) {
        (self.answers.len(), self.sequence.len())
    }

    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    pub fn scores(&self) -> &[ScoringResult] {
        &self.scores
    }

    pub fn answer(&mut self, direction: SwipeDirection) -> Result<SessionStep> {
        let index = self.position.ok_or(QuizError::SessionComplete)?;
        let quiz = self.quiz;
        let question = self.sequence[index];

        if !quiz.choice_mode.allows(direction) {
            return Err(QuizError::DirectionNotAllowed(direction.to_string()));
        }

        let answered = match direction {
            SwipeDirection::Skip => AnsweredQuestion::skipped(question.id.clone()),
            _ => {
                let option = question.option_for(direction).ok_or_else(|| {
                    QuizError::NoOptionForDirection {
                        question: question.id.clone(),
                        direction: direction.to_string(),
                    }
                })?;
                AnsweredQuestion::new(
                    question.id.clone(),
                    option.id.clone(),
                    option.resolved_weights(question.category),
                )
            }
        };
        let answered = match quiz.group_weight(question) {
            Some(weight) => answered.with_group_weight(weight),
            None => answered,
        };

        self.answers.push(answered.clone());
        self.scores = self.engine.calculate_scores(&self.answers, self.formula);
        self.position = self.next_position(index, &answered.option_id);

        let next_question_id = self.current_question().map(|next| next.id.clone());
        tracing::debug!(
            quiz = %self.quiz.id,
            question = %answered.question_id,
            option = %answered.option_id,
            next = ?next_question_id,
            "recorded answer"
        );

        Ok(SessionStep {
            answered,
            scores: self.scores.clone(),
            next_question_id,
        })
    }

    pub fn report(&self) -> ScoreReport {
        ScoreReport::new(
            Some(self.quiz.id.clone()),
            self.formula,
            self.answers.len(),
            self.scores.clone(),
        )
    }

    // Skip targets only move forward; a target at or behind the current
    // question, or one that is inactive, falls through to the next one.
    fn next_position(&self, index: usize, option_id: &str) -> Option<usize> {
        let question = self.sequence[index];
        let next = match question
            .skip_conditions
            .iter()
            .find(|condition| condition.if_answer_id == option_id)
        {
            Some(condition) => match &condition.skip_to_question_id {
                Some(target) => self
                    .sequence
                    .iter()
                    .position(|candidate| candidate.id == *target)
                    .filter(|target_index| *target_index > index)
                    .unwrap_or(index + 1),
                None => index + 2,
            },
            None => index + 1,
        };
        (next < self.sequence.len()).then_some(next)
    }
}
