//! Session context and the finished-session result handed to exporters.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{render_summary, QuizEngine, SessionConfig};
use crate::grading::PassThreshold;
use crate::model::AnswerRecord;
use crate::recommend::{build_recommendations, Recommendations};

/// Per-trainee state that lives alongside the engine for one quiz run.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_name: String,
    pub threshold: PassThreshold,
    pub config: SessionConfig,
    passed: bool,
    started_at: Option<DateTime<Utc>>,
}

impl SessionContext {
    pub fn new(user_name: impl Into<String>, threshold: PassThreshold, config: SessionConfig) -> Self {
        Self {
            user_name: user_name.into(),
            threshold,
            config,
            passed: false,
            started_at: None,
        }
    }

    /// Prepare a new session on `engine`. Also used for retakes.
    pub fn start(&mut self, engine: &mut QuizEngine) {
        engine.prepare_quiz(&self.config);
        self.passed = false;
        self.started_at = Some(Utc::now());
        tracing::info!(
            "quiz started for {:?}: {} questions, pass threshold {}%",
            self.user_name,
            engine.total(),
            self.threshold.percent()
        );
    }

    /// Grade the engine's current session and record whether it passed.
    pub fn finish(&mut self, engine: &QuizEngine) -> SessionResult {
        let score = engine.score();
        let total = engine.total();
        self.passed = self.threshold.is_pass(score, total);

        let result = SessionResult {
            id: Uuid::new_v4(),
            user_name: self.user_name.clone(),
            started_at: self.started_at,
            completed_at: Utc::now(),
            score,
            total,
            percent: engine.percent(),
            threshold_percent: self.threshold.percent(),
            passed: self.passed,
            category_filter: self.config.category.clone(),
            shuffled: self.config.shuffle,
            answers: engine.history().to_vec(),
            recommendations: build_recommendations(engine.history()),
        };
        tracing::info!(
            "quiz finished: {}/{} ({}%), passed: {}",
            score,
            total,
            result.percent,
            result.passed
        );
        result
    }

    /// Whether the most recently finished session passed.
    pub fn passed(&self) -> bool {
        self.passed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: String,
    pub answered: usize,
    pub correct: usize,
}

/// Everything the certificate generator and results exporter need to know
/// about a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub id: Uuid,
    pub user_name: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: DateTime<Utc>,
    pub score: usize,
    pub total: usize,
    pub percent: u32,
    pub threshold_percent: u32,
    pub passed: bool,
    #[serde(default)]
    pub category_filter: Option<String>,
    pub shuffled: bool,
    pub answers: Vec<AnswerRecord>,
    pub recommendations: Recommendations,
}

impl SessionResult {
    /// Same text as `QuizEngine::summary` for the recorded answers.
    pub fn summary(&self) -> String {
        render_summary(self.score, self.total, &self.answers)
    }

    /// One-line verdict shown when the session ends.
    pub fn status_line(&self) -> String {
        let head = format!(
            "Quiz finished. Score: {}/{} ({}%).",
            self.score, self.total, self.percent
        );
        if self.passed {
            format!("{head} PASSED.")
        } else {
            format!(
                "{head} NOT PASSED (need ≥ {}%). Please retake.",
                self.threshold_percent
            )
        }
    }

    /// Answered and correct counts per category, in first-seen order.
    pub fn category_breakdown(&self) -> Vec<CategoryScore> {
        let mut out: Vec<CategoryScore> = Vec::new();
        for rec in &self.answers {
            let pos = match out.iter().position(|c| c.category == rec.category) {
                Some(pos) => pos,
                None => {
                    out.push(CategoryScore {
                        category: rec.category.clone(),
                        answered: 0,
                        correct: 0,
                    });
                    out.len() - 1
                }
            };
            out[pos].answered += 1;
            if rec.is_correct {
                out[pos].correct += 1;
            }
        }
        out
    }

    /// Certificate number: completion date plus the head of the session id.
    pub fn certificate_id(&self) -> String {
        let simple = self.id.simple().to_string().to_uppercase();
        format!("{}-{}", self.completed_at.format("%y%m%d"), &simple[..8])
    }

    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize session result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write results to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read results from {}", path.display()))?;
        let result: SessionResult =
            serde_json::from_str(&content).context("failed to parse results JSON")?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::model::sample_question;

    fn engine_with(n: usize) -> QuizEngine {
        QuizEngine::new(QuestionBank::new(
            (0..n)
                .map(|i| sample_question(&format!("q{i}"), "Storage", 0))
                .collect(),
        ))
    }

    fn play(engine: &mut QuizEngine, correct: usize) {
        let mut answered = 0;
        while engine.current().is_some() {
            let chosen = if answered < correct { 0 } else { 1 };
            engine.check_and_record(chosen);
            answered += 1;
            if !engine.advance() {
                break;
            }
        }
    }

    fn context(count: usize) -> SessionContext {
        SessionContext::new(
            "Ada Trainee",
            PassThreshold::DEFAULT,
            SessionConfig {
                count,
                category: None,
                shuffle: false,
            },
        )
    }

    #[test]
    fn seven_of_ten_passes() {
        let mut engine = engine_with(10);
        let mut ctx = context(10);
        ctx.start(&mut engine);
        play(&mut engine, 7);
        let result = ctx.finish(&engine);
        assert!(result.passed);
        assert!(ctx.passed());
        assert_eq!(result.percent, 70);
        assert!(result.status_line().ends_with("PASSED."));
    }

    #[test]
    fn repeated_answers_to_one_question_do_not_pass() {
        let mut engine = engine_with(10);
        let mut ctx = context(10);
        ctx.start(&mut engine);
        for _ in 0..7 {
            engine.check_and_record(0);
        }
        let result = ctx.finish(&engine);
        assert!(!result.passed);
        assert!(!ctx.passed());
        assert_eq!(result.score, 1);
        assert_eq!(result.answers.len(), 1);
        assert!(result.percent <= 100);
    }

    #[test]
    fn single_question_answered_three_times_scores_once() {
        let mut engine = engine_with(1);
        let mut ctx = context(1);
        ctx.start(&mut engine);
        for _ in 0..3 {
            engine.check_and_record(0);
        }
        let result = ctx.finish(&engine);
        assert_eq!(result.score, 1);
        assert_eq!(result.total, 1);
        assert_eq!(result.percent, 100);
        assert!(result.answers.len() <= result.total);
    }

    #[test]
    fn six_of_ten_fails() {
        let mut engine = engine_with(10);
        let mut ctx = context(10);
        ctx.start(&mut engine);
        play(&mut engine, 6);
        let result = ctx.finish(&engine);
        assert!(!result.passed);
        assert!(result.status_line().contains("NOT PASSED (need ≥ 70%)"));
        assert_eq!(result.recommendations.focus[0].category, "Storage");
        assert_eq!(result.recommendations.focus[0].missed, 4);
    }

    #[test]
    fn retake_clears_pass_flag() {
        let mut engine = engine_with(3);
        let mut ctx = context(3);
        ctx.start(&mut engine);
        play(&mut engine, 3);
        ctx.finish(&engine);
        assert!(ctx.passed());

        ctx.start(&mut engine);
        assert!(!ctx.passed());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn summary_matches_engine() {
        let mut engine = engine_with(3);
        let mut ctx = context(3);
        ctx.start(&mut engine);
        play(&mut engine, 2);
        let result = ctx.finish(&engine);
        assert_eq!(result.summary(), engine.summary());
    }

    #[test]
    fn category_breakdown_counts_in_order() {
        let mut engine = QuizEngine::new(QuestionBank::new(vec![
            sample_question("a", "Storage", 0),
            sample_question("b", "Detection", 0),
            sample_question("c", "Storage", 0),
        ]));
        let mut ctx = context(3);
        ctx.start(&mut engine);
        play(&mut engine, 2);
        let result = ctx.finish(&engine);

        let breakdown = result.category_breakdown();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Storage");
        assert_eq!((breakdown[0].answered, breakdown[0].correct), (2, 1));
        assert_eq!((breakdown[1].answered, breakdown[1].correct), (1, 1));
    }

    #[test]
    fn certificate_id_shape() {
        let mut engine = engine_with(1);
        let mut ctx = context(1);
        ctx.start(&mut engine);
        play(&mut engine, 1);
        let result = ctx.finish(&engine);
        let id = result.certificate_id();
        assert_eq!(id.len(), 15);
        assert_eq!(&id[6..7], "-");
        assert!(id[7..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn json_roundtrip() {
        let mut engine = engine_with(2);
        let mut ctx = context(2);
        ctx.start(&mut engine);
        play(&mut engine, 1);
        let result = ctx.finish(&engine);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("result.json");
        result.save_json(&path).unwrap();
        let loaded = SessionResult::load_json(&path).unwrap();

        assert_eq!(loaded.id, result.id);
        assert_eq!(loaded.user_name, "Ada Trainee");
        assert_eq!(loaded.answers, result.answers);
        assert_eq!(loaded.recommendations, result.recommendations);
    }
}
