//! docval Extractors
//!
//! Format extractors that turn source files into the canonical
//! [`DocumentStructure`](docval_domain::DocumentStructure), and the registry
//! that selects one by name or by file extension.
//!
//! # Formats
//!
//! - `DocxExtractor`: Word packages (`.docx`)
//! - `HtmlExtractor`: HTML pages (`.html`, `.htm`)
//! - `LatexExtractor`: LaTeX sources (`.tex`, `.latex`)
//!
//! # Examples
//!
//! ```no_run
//! use docval_domain::FormatExtractor;
//! use docval_extract::ExtractorRegistry;
//! use std::path::Path;
//!
//! let registry = ExtractorRegistry::default();
//! let extractor = registry.detect(Path::new("thesis.tex")).unwrap();
//! let structure = extractor.parse(Path::new("thesis.tex")).unwrap();
//! println!("{} headings", structure.headings().count());
//! ```

#![warn(missing_docs)]

pub mod docx;
pub mod html;
pub mod latex;
mod registry;
mod source;

pub use docx::DocxExtractor;
pub use html::HtmlExtractor;
pub use latex::LatexExtractor;
pub use registry::{DynExtractor, ExtractorRegistry, Registration};
