//! Core data model types for h2trainer.
//!
//! `Question` is loaded once from a bank and never mutated. `AnswerRecord` is
//! the denormalised snapshot appended to a session history for every
//! submitted answer.

use serde::{Deserialize, Serialize};

/// Category assigned to records that do not name one.
pub const DEFAULT_CATEGORY: &str = "General";

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier assigned by the bank author. Not guaranteed unique.
    pub id: String,
    /// Free-form topic key used for filtering and recommendations.
    pub category: String,
    /// Free-form difficulty label (e.g. "easy", "hard").
    pub difficulty: String,
    /// The prompt shown to the trainee.
    pub question: String,
    /// Answer choices, in display order.
    pub choices: Vec<String>,
    /// Index of the correct entry in `choices`.
    pub correct_index: usize,
    /// Explanation shown after answering. Empty when the bank has none.
    #[serde(default)]
    pub rationale: String,
}

impl Question {
    /// Text of the choice at `index`, or an empty string when out of range.
    pub fn choice_text(&self, index: usize) -> &str {
        self.choices.get(index).map(String::as_str).unwrap_or("")
    }

    /// Text of the correct choice, or an empty string when `correct_index`
    /// does not point into `choices`.
    pub fn correct_text(&self) -> &str {
        self.choice_text(self.correct_index)
    }

    /// Whether `correct_index` addresses an existing choice.
    pub fn has_valid_answer(&self) -> bool {
        self.correct_index < self.choices.len()
    }

    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.correct_index
    }
}

/// One submitted answer, captured by value so later bank changes cannot
/// alter historical results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub question: String,
    /// Text of the chosen option; empty if the chosen index was out of range.
    pub chosen: String,
    /// Text of the correct option; empty if the question's index was invalid.
    pub correct_text: String,
    pub is_correct: bool,
    #[serde(default)]
    pub rationale: String,
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
}

impl AnswerRecord {
    /// Snapshot `question` as answered with `chosen`.
    pub fn capture(question: &Question, chosen: usize) -> Self {
        Self {
            question_id: question.id.clone(),
            question: question.question.clone(),
            chosen: question.choice_text(chosen).to_string(),
            correct_text: question.correct_text().to_string(),
            is_correct: question.is_correct(chosen),
            rationale: question.rationale.clone(),
            category: question.category.clone(),
            difficulty: question.difficulty.clone(),
        }
    }
}

/// Result handed back to the caller after each submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub rationale: String,
}

#[cfg(test)]
pub(crate) fn sample_question(id: &str, category: &str, correct_index: usize) -> Question {
    Question {
        id: id.into(),
        category: category.into(),
        difficulty: "medium".into(),
        question: format!("Question {id}?"),
        choices: vec!["alpha".into(), "beta".into(), "gamma".into()],
        correct_index,
        rationale: format!("Because of {id}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_text_out_of_range_is_empty() {
        let q = sample_question("q1", "Storage", 1);
        assert_eq!(q.choice_text(0), "alpha");
        assert_eq!(q.choice_text(7), "");
        assert_eq!(q.correct_text(), "beta");
    }

    #[test]
    fn invalid_correct_index_degrades_to_empty_text() {
        let q = sample_question("q1", "Storage", 9);
        assert!(!q.has_valid_answer());
        assert_eq!(q.correct_text(), "");
    }

    #[test]
    fn capture_snapshots_question_fields() {
        let q = sample_question("q1", "Ventilation", 2);
        let rec = AnswerRecord::capture(&q, 0);
        assert_eq!(rec.question_id, "q1");
        assert_eq!(rec.chosen, "alpha");
        assert_eq!(rec.correct_text, "gamma");
        assert!(!rec.is_correct);
        assert_eq!(rec.category, "Ventilation");
        assert_eq!(rec.difficulty, "medium");

        let out_of_range = AnswerRecord::capture(&q, 42);
        assert_eq!(out_of_range.chosen, "");
        assert!(!out_of_range.is_correct);
    }
}
