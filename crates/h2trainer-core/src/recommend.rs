//! Topic recommendations derived from missed questions.

use serde::{Deserialize, Serialize};

use crate::model::AnswerRecord;

/// Number of categories highlighted.
pub const MAX_FOCUS_TOPICS: usize = 3;
/// Rationale notes shown per highlighted category.
pub const MAX_NOTES_PER_TOPIC: usize = 2;

/// A category the trainee should revisit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicFocus {
    pub category: String,
    pub missed: usize,
    /// Distinct rationales from the missed questions, in encounter order.
    pub notes: Vec<String>,
}

/// Feedback built from a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recommendations {
    /// Number of answers considered.
    pub answered: usize,
    /// Weakest categories, most misses first.
    pub focus: Vec<TopicFocus>,
    /// Difficulty label with the most misses, if any was labelled.
    pub toughest_difficulty: Option<String>,
}

impl Recommendations {
    pub fn is_perfect(&self) -> bool {
        self.answered > 0 && self.focus.is_empty()
    }

    /// Render as the multi-line block shown after the score summary. An
    /// empty history renders as an empty string.
    pub fn render(&self) -> String {
        if self.answered == 0 {
            return String::new();
        }
        if self.focus.is_empty() {
            return "\nRecommendations:\n\
                    • Great job, no missed questions. Review the safety tips for reinforcement."
                .to_string();
        }

        let mut lines = vec!["\nRecommendations (focus on these topics):".to_string()];
        for topic in &self.focus {
            lines.push(format!(
                "• {} ({} missed): revise fundamentals and procedures.",
                topic.category, topic.missed
            ));
            for (i, note) in topic.notes.iter().enumerate() {
                lines.push(format!("   ↳ Note {}: {}", i + 1, note));
            }
        }
        if let Some(level) = &self.toughest_difficulty {
            lines.push(format!(
                "• Your toughest level: {level}. Try more practice questions in this difficulty."
            ));
        }
        lines.join("\n")
    }
}

/// Build recommendations from an answer history. Pure; ties between equal
/// counts keep the order in which categories were first missed.
pub fn build_recommendations(history: &[AnswerRecord]) -> Recommendations {
    let mut by_category: Vec<TopicFocus> = Vec::new();
    let mut by_difficulty: Vec<(&str, usize)> = Vec::new();

    for rec in history.iter().filter(|r| !r.is_correct) {
        let pos = match by_category.iter().position(|t| t.category == rec.category) {
            Some(pos) => pos,
            None => {
                by_category.push(TopicFocus {
                    category: rec.category.clone(),
                    missed: 0,
                    notes: Vec::new(),
                });
                by_category.len() - 1
            }
        };
        let topic = &mut by_category[pos];
        topic.missed += 1;
        if !rec.rationale.is_empty()
            && topic.notes.len() < MAX_NOTES_PER_TOPIC
            && !topic.notes.contains(&rec.rationale)
        {
            topic.notes.push(rec.rationale.clone());
        }

        match by_difficulty.iter_mut().find(|(d, _)| *d == rec.difficulty) {
            Some((_, count)) => *count += 1,
            None => by_difficulty.push((rec.difficulty.as_str(), 1)),
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    by_category.sort_by(|a, b| b.missed.cmp(&a.missed));
    by_category.truncate(MAX_FOCUS_TOPICS);

    let toughest_difficulty = by_difficulty
        .iter()
        .fold(None::<(&str, usize)>, |best, &(level, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((level, count)),
        })
        .map(|(level, _)| level)
        .filter(|level| !level.is_empty())
        .map(String::from);

    Recommendations {
        answered: history.len(),
        focus: by_category,
        toughest_difficulty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, difficulty: &str, correct: bool, rationale: &str) -> AnswerRecord {
        AnswerRecord {
            question_id: String::new(),
            question: "q".into(),
            chosen: "a".into(),
            correct_text: "b".into(),
            is_correct: correct,
            rationale: rationale.into(),
            category: category.into(),
            difficulty: difficulty.into(),
        }
    }

    #[test]
    fn ranks_categories_by_missed_count() {
        let history = vec![
            record("A", "easy", false, ""),
            record("B", "easy", false, ""),
            record("C", "hard", false, ""),
            record("A", "easy", false, ""),
            record("C", "hard", false, ""),
            record("A", "hard", false, ""),
            record("B", "easy", true, ""),
        ];
        let recs = build_recommendations(&history);
        let order: Vec<_> = recs.focus.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
        assert_eq!(recs.focus[0].missed, 3);
    }

    #[test]
    fn keeps_only_top_three_with_first_seen_tie_break() {
        let history = vec![
            record("D", "", false, ""),
            record("B", "", false, ""),
            record("A", "", false, ""),
            record("C", "", false, ""),
        ];
        let recs = build_recommendations(&history);
        let order: Vec<_> = recs.focus.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(order, vec!["D", "B", "A"]);
    }

    #[test]
    fn collects_up_to_two_distinct_notes() {
        let history = vec![
            record("Vent", "", false, "first"),
            record("Vent", "", false, ""),
            record("Vent", "", false, "first"),
            record("Vent", "", false, "second"),
            record("Vent", "", false, "third"),
        ];
        let recs = build_recommendations(&history);
        assert_eq!(recs.focus[0].notes, vec!["first", "second"]);
        let text = recs.render();
        assert!(text.contains("↳ Note 1: first"));
        assert!(text.contains("↳ Note 2: second"));
        assert!(!text.contains("third"));
    }

    #[test]
    fn reports_toughest_difficulty() {
        let history = vec![
            record("A", "easy", false, ""),
            record("A", "hard", false, ""),
            record("B", "hard", false, ""),
        ];
        let recs = build_recommendations(&history);
        assert_eq!(recs.toughest_difficulty.as_deref(), Some("hard"));
        assert!(recs.render().contains("Your toughest level: hard"));
    }

    #[test]
    fn unlabelled_difficulty_gives_no_hint() {
        let history = vec![record("A", "", false, ""), record("A", "", false, "")];
        let recs = build_recommendations(&history);
        assert!(recs.toughest_difficulty.is_none());
        assert!(!recs.render().contains("toughest"));
    }

    #[test]
    fn perfect_session_congratulates() {
        let history = vec![record("A", "easy", true, ""), record("B", "hard", true, "")];
        let recs = build_recommendations(&history);
        assert!(recs.is_perfect());
        assert!(recs.render().contains("no missed questions"));
    }

    #[test]
    fn empty_history_renders_nothing() {
        let recs = build_recommendations(&[]);
        assert!(!recs.is_perfect());
        assert_eq!(recs.render(), "");
    }
}
