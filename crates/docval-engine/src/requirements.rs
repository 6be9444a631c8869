//! Requirement file loading
//!
//! A requirement file is a JSON array of objects:
//!
//! ```json
//! [
//!   {"name": "Has Title", "description": "The document must have a title", "score": 2.0},
//!   {"name": "Has Author", "description": "Author metadata is set", "category": "metadata"}
//! ]
//! ```
//!
//! Entries deserialize as [`Requirement`]; keys it does not know are ignored.
//! Errors name the offending entry, and the field when it is missing.

use crate::error::{EngineError, SchemaError};
use docval_domain::Requirement;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read and validate a requirement file
pub fn load_requirements(path: &Path) -> Result<Vec<Requirement>, EngineError> {
    let content = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let requirements = parse_requirements(&content)?;
    debug!("Loaded {} requirements from {}", requirements.len(), path.display());
    Ok(requirements)
}

/// Validate requirement JSON text
pub fn parse_requirements(json: &str) -> Result<Vec<Requirement>, EngineError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SchemaError::document(format!("not valid JSON: {}", e)))?;

    let entries = value
        .as_array()
        .ok_or_else(|| SchemaError::document("expected a JSON array of requirements"))?;

    let requirements = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| parse_entry(idx, entry))
        .collect::<Result<Vec<_>, _>>()?;

    ensure_unique_names(&requirements)?;
    Ok(requirements)
}

/// Reject requirement lists in which a name appears twice
pub fn ensure_unique_names(requirements: &[Requirement]) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    for requirement in requirements {
        if !seen.insert(requirement.name.as_str()) {
            return Err(EngineError::DuplicateRequirement(requirement.name.clone()));
        }
    }
    Ok(())
}

fn parse_entry(idx: usize, entry: &Value) -> Result<Requirement, SchemaError> {
    if !entry.is_object() {
        return Err(SchemaError::entry(idx, "expected an object"));
    }

    serde_json::from_value(entry.clone()).map_err(|e| {
        let message = e.to_string();
        match missing_field(&message) {
            Some(field) => SchemaError::field(idx, field, "missing required field"),
            None => SchemaError::entry(idx, message),
        }
    })
}

/// Field named by serde's "missing field `x`" message
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}
