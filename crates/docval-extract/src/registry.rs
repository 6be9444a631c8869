//! Extractor selection by name or file extension

use crate::source::path_extension;
use crate::{docx, html, latex, DocxExtractor, HtmlExtractor, LatexExtractor};
use docval_domain::{ExtractError, FormatExtractor};
use std::path::Path;
use tracing::debug;

/// Extractor usable from any thread
pub type DynExtractor = dyn FormatExtractor + Send + Sync;

/// A named extractor and the extensions it claims
pub struct Registration {
    /// Format name used for explicit selection (`docx`, `html`, `latex`)
    pub name: &'static str,
    /// Extensions without the leading dot
    pub extensions: &'static [&'static str],
    /// The extractor itself
    pub extractor: Box<DynExtractor>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

/// Ordered set of extractors
///
/// Lookup walks registrations in insertion order and the first match wins.
#[derive(Debug)]
pub struct ExtractorRegistry {
    registrations: Vec<Registration>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Append an extractor; earlier registrations take precedence
    pub fn register(&mut self, registration: Registration) {
        self.registrations.push(registration);
    }

    /// Select an extractor by format name, case-insensitive
    pub fn get(&self, name: &str) -> Result<&DynExtractor, ExtractError> {
        let wanted = name.to_lowercase();
        self.registrations
            .iter()
            .find(|r| r.name == wanted)
            .map(|r| r.extractor.as_ref())
            .ok_or_else(|| ExtractError::UnknownFormat {
                requested: name.to_string(),
                supported: self.names().map(str::to_string).collect(),
            })
    }

    /// Select an extractor from the path's extension
    pub fn detect(&self, path: &Path) -> Result<&DynExtractor, ExtractError> {
        let extension = path_extension(path);
        let found = self
            .registrations
            .iter()
            .find(|r| r.extractor.supports_extension(&extension));

        match found {
            Some(r) => {
                debug!("Detected format '{}' for {}", r.name, path.display());
                Ok(r.extractor.as_ref())
            }
            None => Err(ExtractError::UnknownFormat {
                requested: format!(".{}", extension),
                supported: self.supported_extensions(),
            }),
        }
    }

    /// Registered format names in lookup order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registrations.iter().map(|r| r.name)
    }

    /// Every claimed extension, dotted, in lookup order
    pub fn supported_extensions(&self) -> Vec<String> {
        self.registrations
            .iter()
            .flat_map(|r| r.extensions.iter().map(|e| format!(".{}", e)))
            .collect()
    }
}

impl Default for ExtractorRegistry {
    /// Built-in extractors: docx, html, latex
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Registration {
            name: "docx",
            extensions: docx::EXTENSIONS,
            extractor: Box::new(DocxExtractor::new()),
        });
        registry.register(Registration {
            name: "html",
            extensions: html::EXTENSIONS,
            extractor: Box::new(HtmlExtractor::new()),
        });
        registry.register(Registration {
            name: "latex",
            extensions: latex::EXTENSIONS,
            extractor: Box::new(LatexExtractor::new()),
        });
        registry
    }
}
