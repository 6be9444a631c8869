//! Error types for the validation engine

use docval_domain::ExtractError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a validation run or a requirement load
#[derive(Error, Debug)]
pub enum EngineError {
    /// Extractor selection or document parsing failed
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// Requirement file does not match the expected shape
    #[error("Invalid requirements: {0}")]
    Schema(#[from] SchemaError),

    /// Two requirements share a name
    #[error("Duplicate requirement name: '{0}'")]
    DuplicateRequirement(String),

    /// Engine configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document structure could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requirement file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A judge call failed
    #[error("{0}")]
    Judge(String),

    /// A judge call did not answer in time
    #[error("Judge call timed out after {0}s")]
    Timeout(u64),
}

/// A requirement entry that does not match the schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}{message}", location(.entry, .field))]
pub struct SchemaError {
    /// Zero-based index of the offending entry, if the problem is in one
    pub entry: Option<usize>,
    /// Offending field, if the problem is in one
    pub field: Option<String>,
    /// What is wrong
    pub message: String,
}

impl SchemaError {
    /// Problem with the document as a whole
    pub fn document(message: impl Into<String>) -> Self {
        Self {
            entry: None,
            field: None,
            message: message.into(),
        }
    }

    /// Problem with one entry
    pub fn entry(entry: usize, message: impl Into<String>) -> Self {
        Self {
            entry: Some(entry),
            field: None,
            message: message.into(),
        }
    }

    /// Problem with one field of one entry
    pub fn field(entry: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entry: Some(entry),
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

fn location(entry: &Option<usize>, field: &Option<String>) -> String {
    match (entry, field) {
        (Some(i), Some(f)) => format!("entry {}, field '{}': ", i, f),
        (Some(i), None) => format!("entry {}: ", i),
        (None, Some(f)) => format!("field '{}': ", f),
        (None, None) => String::new(),
    }
}
