//! Canonical document record produced by every format extractor

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Which extractor produced a [`DocumentStructure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Word-processor package (`.docx`)
    Docx,
    /// Hypertext (`.html`, `.htm`)
    Html,
    /// Markup-language source (`.tex`, `.latex`)
    Latex,
}

impl DocumentType {
    /// Get the stable string tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Docx => "docx",
            DocumentType::Html => "html",
            DocumentType::Latex => "latex",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a captioned float in markup-source documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatKind {
    /// `figure` environment
    Figure,
    /// `table` environment
    Table,
}

/// A typed node of the document body, in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralElement {
    /// Heading or section title
    Heading {
        /// Nesting level (0 = chapter/title, 1 = top-level section)
        level: u8,
        /// Heading text
        text: String,
    },

    /// Paragraph-like body text
    Paragraph {
        /// Paragraph text
        text: String,
        /// Style name, when the format has paragraph styles
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        /// Number of formatting runs, when the format exposes them
        #[serde(default, skip_serializing_if = "Option::is_none")]
        runs: Option<usize>,
    },

    /// Table as a row-major grid of cell text
    Table {
        /// Number of rows
        rows: usize,
        /// Number of columns
        columns: usize,
        /// Cell text, one inner vector per row
        cells: Vec<Vec<String>>,
    },

    /// Ordered or unordered list
    List {
        /// True for numbered lists
        ordered: bool,
        /// Item texts
        items: Vec<String>,
    },

    /// Captioned float (figure or table environment)
    Float {
        /// Figure or table
        float: FloatKind,
        /// Caption text with formatting commands stripped
        caption: String,
        /// Cross-reference label, empty when absent
        label: String,
    },

    /// Display equation
    Equation {
        /// Equation body without its label command
        body: String,
        /// Cross-reference label, empty when absent
        label: String,
    },
}

/// Format-agnostic structure of one parsed document
///
/// Created fresh by each extractor call and never mutated by the engine.
/// `format_specific` is opaque pass-through data: only extractors and
/// external consumers interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Identifier of the originating file
    pub source_path: String,

    /// Which extractor produced this record
    pub document_type: DocumentType,

    /// Title, author, date, subject, ... as exposed by the format
    pub metadata: BTreeMap<String, String>,

    /// Body nodes in document order
    pub structural_elements: Vec<StructuralElement>,

    /// Attributes meaningful only to one format
    pub format_specific: BTreeMap<String, Value>,
}

impl DocumentStructure {
    /// Create an empty structure for a source file
    pub fn new(source_path: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            source_path: source_path.into(),
            document_type,
            metadata: BTreeMap::new(),
            structural_elements: Vec::new(),
            format_specific: BTreeMap::new(),
        }
    }

    /// All headings with their levels, in document order
    pub fn headings(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        self.structural_elements.iter().filter_map(|e| match e {
            StructuralElement::Heading { level, text } => Some((*level, text.as_str())),
            _ => None,
        })
    }

    /// Count elements matching a predicate
    pub fn count_elements(&self, predicate: impl Fn(&StructuralElement) -> bool) -> usize {
        self.structural_elements.iter().filter(|e| predicate(e)).count()
    }

    /// Serialize to the deterministic text form sent to the judge
    ///
    /// Maps are ordered and element order is document order, so the same
    /// file bytes always yield the same text.
    pub fn to_context_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DocumentStructure {
        let mut doc = DocumentStructure::new("report.tex", DocumentType::Latex);
        doc.metadata.insert("title".to_string(), "Test".to_string());
        doc.structural_elements.push(StructuralElement::Heading {
            level: 1,
            text: "Intro".to_string(),
        });
        doc.structural_elements.push(StructuralElement::Paragraph {
            text: "Body".to_string(),
            style: None,
            runs: None,
        });
        doc.format_specific.insert("citation_count".to_string(), json!(3));
        doc.format_specific.insert("has_bibliography".to_string(), json!(true));
        doc
    }

    #[test]
    fn test_document_type_tags() {
        assert_eq!(DocumentType::Docx.as_str(), "docx");
        assert_eq!(DocumentType::Html.to_string(), "html");
        assert_eq!(
            serde_json::to_value(DocumentType::Latex).unwrap(),
            json!("latex")
        );
    }

    #[test]
    fn test_context_json_is_deterministic() {
        let a = sample().to_context_json().unwrap();
        let b = sample().to_context_json().unwrap();
        assert_eq!(a, b);

        // BTreeMap keeps keys sorted
        let cites = a.find("citation_count").unwrap();
        let bib = a.find("has_bibliography").unwrap();
        assert!(cites < bib);
    }

    #[test]
    fn test_serialization_preserves_scalars() {
        let doc = sample();
        let text = doc.to_context_json().unwrap();
        let back: DocumentStructure = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_element_tagging() {
        let value = serde_json::to_value(StructuralElement::Equation {
            body: "E = mc^2".to_string(),
            label: "eq:1".to_string(),
        })
        .unwrap();
        assert_eq!(value["kind"], "equation");
        assert_eq!(value["label"], "eq:1");

        // Optional paragraph fields are omitted, not null
        let para = serde_json::to_value(StructuralElement::Paragraph {
            text: "x".to_string(),
            style: None,
            runs: None,
        })
        .unwrap();
        assert!(para.get("style").is_none());
    }

    #[test]
    fn test_headings_iterator() {
        let doc = sample();
        let headings: Vec<_> = doc.headings().collect();
        assert_eq!(headings, vec![(1, "Intro")]);
        assert_eq!(
            doc.count_elements(|e| matches!(e, StructuralElement::Paragraph { .. })),
            1
        );
    }
}
