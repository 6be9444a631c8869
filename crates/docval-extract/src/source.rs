//! Shared file access for extractors

use docval_domain::ExtractError;
use std::fs;
use std::path::Path;

/// Normalize an extension for comparison: lowercase, no leading dot
pub(crate) fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

/// True if `extension` is one of `supported` (given without dots)
pub(crate) fn extension_in(extension: &str, supported: &[&str]) -> bool {
    let ext = normalize_extension(extension);
    supported.iter().any(|s| *s == ext)
}

/// Extension of a path, lowercased, or an empty string
pub(crate) fn path_extension(path: &Path) -> String {
    path.extension()
        .map(|e| normalize_extension(&e.to_string_lossy()))
        .unwrap_or_default()
}

/// Check existence and extension, then read the raw bytes
pub(crate) fn read_source(
    path: &Path,
    supports: impl Fn(&str) -> bool,
    format_name: &str,
) -> Result<Vec<u8>, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }

    let extension = path_extension(path);
    if !supports(&extension) {
        return Err(ExtractError::unsupported(
            path,
            format!("extension '.{}' is not a {} file", extension, format_name),
        ));
    }

    fs::read(path).map_err(|source| ExtractError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a text source, replacing invalid UTF-8 sequences
pub(crate) fn read_text_lossy(
    path: &Path,
    supports: impl Fn(&str) -> bool,
    format_name: &str,
) -> Result<String, ExtractError> {
    let bytes = read_source(path, supports, format_name)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_normalization() {
        assert_eq!(normalize_extension(".DOCX"), "docx");
        assert_eq!(normalize_extension("tex"), "tex");
        assert!(extension_in(".HTM", &["html", "htm"]));
        assert!(!extension_in(".pdf", &["html", "htm"]));
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(path_extension(Path::new("a/b/Report.TeX")), "tex");
        assert_eq!(path_extension(Path::new("README")), "");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_source(Path::new("does/not/exist.tex"), |_| true, "LaTeX");
        assert!(matches!(result, Err(ExtractError::NotFound(_))));
    }
}
