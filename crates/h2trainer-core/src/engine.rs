//! Quiz session engine.
//!
//! Selects a subset of the bank for a session, walks it question by
//! question, and keeps the running score and the answer history.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::QuestionBank;
use crate::model::{AnswerOutcome, AnswerRecord, Question};

/// How a session picks its questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Requested number of questions. Values below 1 are treated as 1.
    pub count: usize,
    /// Only questions in this category; `None` takes the whole bank.
    pub category: Option<String>,
    /// Shuffle the pool before truncating.
    pub shuffle: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            count: 10,
            category: None,
            shuffle: true,
        }
    }
}

/// Lifecycle of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// No session prepared yet.
    Unconfigured,
    /// A question is waiting to be answered or advanced past.
    InProgress,
    /// The session is exhausted.
    Finished,
}

/// The quiz engine. Owns the bank and the single active session.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    bank: QuestionBank,
    quiz_items: Vec<Question>,
    index: usize,
    correct_count: usize,
    history: Vec<AnswerRecord>,
    configured: bool,
    exhausted: bool,
}

impl QuizEngine {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            quiz_items: Vec::new(),
            index: 0,
            correct_count: 0,
            history: Vec::new(),
            configured: false,
            exhausted: false,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Start a fresh session, discarding any previous one.
    pub fn prepare_quiz(&mut self, config: &SessionConfig) {
        self.prepare_quiz_with_rng(config, &mut rand::thread_rng());
    }

    /// `prepare_quiz` with a caller-supplied random source.
    pub fn prepare_quiz_with_rng<R: Rng + ?Sized>(&mut self, config: &SessionConfig, rng: &mut R) {
        let mut pool: Vec<Question> = self
            .bank
            .questions()
            .iter()
            .filter(|q| config.category.as_ref().map_or(true, |c| &q.category == c))
            .cloned()
            .collect();

        if config.shuffle {
            pool.shuffle(rng);
        }
        pool.truncate(config.count.max(1));

        tracing::debug!(
            "prepared quiz: {} items (requested {}, category {:?}, shuffle {})",
            pool.len(),
            config.count,
            config.category,
            config.shuffle
        );

        self.quiz_items = pool;
        self.index = 0;
        self.correct_count = 0;
        self.history.clear();
        self.configured = true;
        self.exhausted = false;
    }

    pub fn state(&self) -> QuizState {
        if !self.configured {
            QuizState::Unconfigured
        } else if self.exhausted || self.current().is_none() {
            QuizState::Finished
        } else {
            QuizState::InProgress
        }
    }

    /// The question at the current position, or `None` at the end of the quiz.
    pub fn current(&self) -> Option<&Question> {
        if self.exhausted {
            return None;
        }
        self.quiz_items.get(self.index)
    }

    /// Grade `chosen` against the current question and append it to the
    /// history. Without a current question, or when the current question
    /// already has an answer, this does nothing and reports an incorrect
    /// answer with no rationale.
    pub fn check_and_record(&mut self, chosen: usize) -> AnswerOutcome {
        // One answer per question.
        if self.history.len() > self.index {
            return AnswerOutcome::default();
        }
        let Some(question) = self.current() else {
            return AnswerOutcome::default();
        };

        let record = AnswerRecord::capture(question, chosen);
        let outcome = AnswerOutcome {
            is_correct: record.is_correct,
            rationale: record.rationale.clone(),
        };

        if record.is_correct {
            self.correct_count += 1;
        }
        self.history.push(record);
        outcome
    }

    /// Move to the next question. Returns `false` when already on the last
    /// one, which finishes the session.
    pub fn advance(&mut self) -> bool {
        if self.index + 1 < self.quiz_items.len() {
            self.index += 1;
            true
        } else {
            self.exhausted = true;
            false
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn quiz_items(&self) -> &[Question] {
        &self.quiz_items
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn score(&self) -> usize {
        self.correct_count
    }

    pub fn total(&self) -> usize {
        self.quiz_items.len()
    }

    /// Whole-number percentage, rounded down. An empty session scores 0%.
    pub fn percent(&self) -> u32 {
        percent(self.correct_count, self.total())
    }

    /// Score line followed by a review of every submitted answer.
    pub fn summary(&self) -> String {
        render_summary(self.correct_count, self.total(), &self.history)
    }
}

/// Text summary of a session: the score line, then each answer in
/// submission order with the rationale when one exists.
pub fn render_summary(score: usize, total: usize, history: &[AnswerRecord]) -> String {
    let mut lines = vec![
        format!("Your score: {}/{} ({}%)\n", score, total, percent(score, total)),
        "Review:\n".to_string(),
    ];
    for (i, rec) in history.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, rec.question));
        lines.push(format!("   Your answer: {}", rec.chosen));
        lines.push(format!("   Correct answer: {}", rec.correct_text));
        if !rec.rationale.is_empty() {
            lines.push(format!("   Why: {}", rec.rationale));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// `100 * score / max(1, total)`, rounded down and capped at 100.
pub fn percent(score: usize, total: usize) -> u32 {
    let value = (100 * score / total.max(1)).min(100);
    u32::try_from(value).unwrap_or(100)
}
