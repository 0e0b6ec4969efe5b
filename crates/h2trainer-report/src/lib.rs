//! h2trainer-report: Files produced from a finished session or a
//! simulation snapshot.
//!
//! - [`html`]: self-contained review page for a `SessionResult`
//! - [`certificate`]: completion certificate, only for passed sessions
//! - [`heatmap`]: SVG rendering of the dispersion colour field

pub mod certificate;
pub mod heatmap;
pub mod html;

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Create the parent directory of `path` if it has one.
pub(crate) fn ensure_parent(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};
    use h2trainer_core::model::AnswerRecord;
    use h2trainer_core::recommend::build_recommendations;
    use h2trainer_core::session::SessionResult;

    pub fn answer(id: &str, category: &str, is_correct: bool) -> AnswerRecord {
        AnswerRecord {
            question_id: id.into(),
            question: format!("What about {id}?"),
            chosen: if is_correct { "right".into() } else { "wrong".into() },
            correct_text: "right".into(),
            is_correct,
            rationale: format!("Because <{id}>."),
            category: category.into(),
            difficulty: "medium".into(),
        }
    }

    pub fn session(passed: bool) -> SessionResult {
        let answers = vec![
            answer("q1", "Storage", true),
            answer("q2", "Detection", passed),
            answer("q3", "Storage", passed),
        ];
        let score = answers.iter().filter(|a| a.is_correct).count();
        SessionResult {
            id: uuid::Uuid::nil(),
            user_name: "Ada <Trainee>".into(),
            started_at: None,
            completed_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
            score,
            total: answers.len(),
            percent: h2trainer_core::engine::percent(score, answers.len()),
            threshold_percent: 70,
            passed,
            category_filter: None,
            shuffled: true,
            recommendations: build_recommendations(&answers),
            answers,
        }
    }
}
