//! Question bank load errors.
//!
//! A bank either loads completely or not at all; every failure names the
//! offending record so the author can fix the source file.

use thiserror::Error;

/// Errors that can occur while loading a question bank.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source is not valid JSON.
    #[error("malformed question bank JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The top-level value is not an array of records.
    #[error("question bank must be a JSON array of records")]
    NotAnArray,

    /// A record is not a JSON object.
    #[error("record {index} is not an object")]
    NotAnObject { index: usize },

    /// A required field is absent.
    #[error("record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// A field is present but has the wrong shape.
    #[error("record {index} has invalid `{field}`: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// The source file could not be read.
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Index of the offending record, if the error is record-specific.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            LoadError::NotAnObject { index }
            | LoadError::MissingField { index, .. }
            | LoadError::InvalidField { index, .. } => Some(*index),
            _ => None,
        }
    }
}
