//! JSON question bank loader.
//!
//! Loads question banks from JSON arrays, converts loosely typed records into
//! `Question`s through a validating constructor, and reports soft issues that
//! do not prevent a bank from loading.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::model::{Question, DEFAULT_CATEGORY};

/// An immutable, ordered catalog of questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parse a JSON array of question records. Any bad record fails the
    /// whole load.
    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Array(records) = value else {
            return Err(LoadError::NotAnArray);
        };

        let questions = records
            .iter()
            .enumerate()
            .map(|(index, record)| question_from_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("parsed {} questions", questions.len());
        Ok(Self { questions })
    }

    /// Read and parse a question bank file.
    pub fn load_path(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let bank = Self::from_json_str(&content)?;
        tracing::info!(
            "loaded {} questions from {}",
            bank.len(),
            path.display()
        );
        Ok(bank)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Distinct categories, sorted for display in filters.
    pub fn categories(&self) -> BTreeSet<String> {
        self.questions.iter().map(|q| q.category.clone()).collect()
    }
}

/// Build a `Question` from one loosely typed record.
///
/// `question`, `choices` and `correct_index` are required. `id` may be a
/// string or a number; `category` defaults to "General"; `difficulty` and
/// `rationale` default to empty.
pub fn question_from_record(index: usize, record: &Value) -> Result<Question, LoadError> {
    let Value::Object(fields) = record else {
        return Err(LoadError::NotAnObject { index });
    };

    let question = match required(fields, index, "question")? {
        Value::String(s) => s.clone(),
        other => return Err(invalid(index, "question", format!("expected string, got {other}"))),
    };

    let choices = match required(fields, index, "choices")? {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(invalid(
                    index,
                    "choices",
                    format!("expected string choice, got {other}"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        other => return Err(invalid(index, "choices", format!("expected array, got {other}"))),
    };
    if choices.is_empty() {
        return Err(invalid(index, "choices", "must contain at least one choice".into()));
    }

    let correct_index = parse_index(index, required(fields, index, "correct_index")?)?;

    Ok(Question {
        id: optional_text(fields, index, "id")?.unwrap_or_default(),
        category: optional_text(fields, index, "category")?
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        difficulty: optional_text(fields, index, "difficulty")?.unwrap_or_default(),
        question,
        choices,
        correct_index,
        rationale: optional_text(fields, index, "rationale")?.unwrap_or_default(),
    })
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a Value, LoadError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(LoadError::MissingField { index, field }),
        Some(value) => Ok(value),
    }
}

fn optional_text(
    fields: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Option<String>, LoadError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(invalid(index, field, format!("expected string, got {other}"))),
    }
}

fn parse_index(index: usize, value: &Value) -> Result<usize, LoadError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid(index, "correct_index", format!("expected non-negative integer, got {value}")))
}

fn invalid(index: usize, field: &'static str, reason: String) -> LoadError {
    LoadError::InvalidField {
        index,
        field,
        reason,
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a loaded bank for issues that degrade a quiz without breaking it.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for q in bank.questions() {
        if !q.id.is_empty() && !seen_ids.insert(q.id.as_str()) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in bank.questions() {
        let question_id = Some(q.id.clone()).filter(|id| !id.is_empty());

        if !q.has_valid_answer() {
            warnings.push(ValidationWarning {
                question_id: question_id.clone(),
                message: format!(
                    "correct_index {} is out of range for {} choices",
                    q.correct_index,
                    q.choices.len()
                ),
            });
        }

        if q.question.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: question_id.clone(),
                message: "question text is empty".into(),
            });
        }

        let mut seen_choices = HashSet::new();
        if q.choices.iter().any(|c| !seen_choices.insert(c.trim())) {
            warnings.push(ValidationWarning {
                question_id,
                message: "choices contain duplicate text".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BANK: &str = r#"[
        {
            "id": "h2-001",
            "category": "Properties",
            "difficulty": "easy",
            "question": "Is hydrogen lighter than air?",
            "choices": ["Yes", "No"],
            "correct_index": 0,
            "rationale": "Hydrogen is about 14 times lighter than air."
        },
        {
            "id": 2,
            "question": "Where should H2 detectors be mounted?",
            "choices": ["Floor", "Ceiling"],
            "correct_index": "1"
        }
    ]"#;

    #[test]
    fn parse_valid_bank() {
        let bank = QuestionBank::from_json_str(VALID_BANK).unwrap();
        assert_eq!(bank.len(), 2);
        let first = &bank.questions()[0];
        assert_eq!(first.id, "h2-001");
        assert_eq!(first.category, "Properties");
        assert_eq!(first.correct_index, 0);
        assert!(first.rationale.starts_with("Hydrogen"));
    }

    #[test]
    fn parse_missing_optional_fields() {
        let bank = QuestionBank::from_json_str(VALID_BANK).unwrap();
        let second = &bank.questions()[1];
        assert_eq!(second.id, "2");
        assert_eq!(second.category, DEFAULT_CATEGORY);
        assert_eq!(second.difficulty, "");
        assert_eq!(second.rationale, "");
        assert_eq!(second.correct_index, 1);
    }

    #[test]
    fn missing_required_field_fails_whole_load() {
        let json = r#"[
            {"question": "ok", "choices": ["a"], "correct_index": 0},
            {"question": "no choices", "correct_index": 0}
        ]"#;
        let err = QuestionBank::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField {
                index: 1,
                field: "choices"
            }
        ));
        assert_eq!(err.record_index(), Some(1));
    }

    #[test]
    fn missing_correct_index_fails() {
        let json = r#"[{"question": "q", "choices": ["a", "b"]}]"#;
        let err = QuestionBank::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("correct_index"));
    }

    #[test]
    fn negative_or_non_numeric_index_is_invalid() {
        for bad in [r#"-1"#, r#""two""#, r#"1.5"#, r#"true"#] {
            let json = format!(r#"[{{"question": "q", "choices": ["a"], "correct_index": {bad}}}]"#);
            let err = QuestionBank::from_json_str(&json).unwrap_err();
            assert!(
                matches!(err, LoadError::InvalidField { field: "correct_index", .. }),
                "expected invalid correct_index for {bad}, got {err}"
            );
        }
    }

    #[test]
    fn empty_choices_rejected() {
        let json = r#"[{"question": "q", "choices": [], "correct_index": 0}]"#;
        let err = QuestionBank::from_json_str(json).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { field: "choices", .. }));
    }

    #[test]
    fn parse_malformed_json() {
        let err = QuestionBank::from_json_str("[{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn top_level_must_be_array() {
        let err = QuestionBank::from_json_str(r#"{"question": "q"}"#).unwrap_err();
        assert!(matches!(err, LoadError::NotAnArray));

        let err = QuestionBank::from_json_str(r#"["just a string"]"#).unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject { index: 0 }));
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let json = r#"[
            {"category": "Ventilation", "question": "a", "choices": ["x"], "correct_index": 0},
            {"category": "Detection", "question": "b", "choices": ["x"], "correct_index": 0},
            {"category": "Ventilation", "question": "c", "choices": ["x"], "correct_index": 0}
        ]"#;
        let bank = QuestionBank::from_json_str(json).unwrap();
        let cats: Vec<_> = bank.categories().into_iter().collect();
        assert_eq!(cats, vec!["Detection", "Ventilation"]);
    }

    #[test]
    fn load_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        std::fs::write(&path, VALID_BANK).unwrap();

        let bank = QuestionBank::load_path(&path).unwrap();
        assert_eq!(bank.len(), 2);

        let missing = QuestionBank::load_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, LoadError::Io { .. }));
    }

    #[test]
    fn validate_reports_soft_issues() {
        let json = r#"[
            {"id": "same", "question": "a", "choices": ["x", "y"], "correct_index": 0},
            {"id": "same", "question": "b", "choices": ["x", "y"], "correct_index": 5},
            {"id": "blank", "question": "  ", "choices": ["x", "x"], "correct_index": 0}
        ]"#;
        let bank = QuestionBank::from_json_str(json).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate question ID")));
        assert!(warnings.iter().any(|w| w.message.contains("out of range")));
        assert!(warnings.iter().any(|w| w.message.contains("empty")));
        assert!(warnings.iter().any(|w| w.message.contains("duplicate text")));
    }

    #[test]
    fn validate_clean_bank_has_no_warnings() {
        let bank = QuestionBank::from_json_str(VALID_BANK).unwrap();
        assert!(validate_bank(&bank).is_empty());
    }
}
