//! Extraction error taxonomy shared by every format extractor

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while selecting an extractor or parsing a document
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Input file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Content cannot be interpreted as the requested format
    #[error("Unsupported document {}: {reason}", .path.display())]
    Unsupported {
        /// Offending file
        path: PathBuf,
        /// What could not be interpreted
        reason: String,
    },

    /// I/O failure while reading the file
    #[error("Failed to read {}: {source}", .path.display())]
    Unreadable {
        /// Offending file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No registered extractor matches the name or extension
    #[error("Unknown format '{requested}'. Supported: {}", .supported.join(", "))]
    UnknownFormat {
        /// Format name or extension that was requested
        requested: String,
        /// Valid names or extensions
        supported: Vec<String>,
    },
}

impl ExtractError {
    /// Build an [`ExtractError::Unsupported`] for a path
    pub fn unsupported(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ExtractError::Unsupported {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
