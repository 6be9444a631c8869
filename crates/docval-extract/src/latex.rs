//! LaTeX source extractor
//!
//! Pattern-based: the source is never compiled or fully tokenized. Constructs
//! that no pattern finds simply yield empty lists or absent metadata keys.

use crate::source::{extension_in, read_text_lossy};
use docval_domain::{
    DocumentStructure, DocumentType, ExtractError, FloatKind, FormatExtractor, StructuralElement,
};
use regex::Regex;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Extensions handled by [`LatexExtractor`]
pub const EXTENSIONS: &[&str] = &["tex", "latex"];

static DOCUMENT_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\documentclass(?:\[.*?\])?\{(.*?)\}").expect("documentclass regex")
});

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\title\{(.*?)\}").expect("title regex"));
static AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\author\{(.*?)\}").expect("author regex"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\date\{(.*?)\}").expect("date regex"));

/// Sectioning commands with their heading level, in extraction order
static SECTION_RES: LazyLock<Vec<(Regex, u8)>> = LazyLock::new(|| {
    [
        ("section", 1),
        ("subsection", 2),
        ("subsubsection", 3),
        ("chapter", 0),
    ]
    .into_iter()
    .map(|(cmd, level)| {
        let re = Regex::new(&format!(r"(?s)\\{}\{{(.*?)\}}", cmd)).expect("section regex");
        (re, level)
    })
    .collect()
});

static FIGURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{figure\}(.*?)\\end\{figure\}").expect("figure regex")
});
static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{table\}(.*?)\\end\{table\}").expect("table regex")
});
static EQUATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{equation\}(.*?)\\end\{equation\}").expect("equation regex")
});
static CAPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\caption\{(.*?)\}").expect("caption regex"));
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\label\{(.*?)\}").expect("label regex"));

static BIBLIOGRAPHY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\bibliography\{.*?\}|\\begin\{thebibliography\}").expect("bibliography regex")
});
static CITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\cite\{(.*?)\}").expect("cite regex"));
static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\usepackage(?:\[.*?\])?\{(.*?)\}").expect("usepackage regex")
});

// Formatting cleanup, applied in order
static FORMATTING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\(?:textbf|textit|emph)\{(.*?)\}").expect("formatting regex")
});
static ONE_ARG_COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\[a-zA-Z]+\{(.*?)\}").expect("command regex"));
static BARE_COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+").expect("bare command regex"));

/// Extractor for LaTeX sources
#[derive(Debug, Default, Clone, Copy)]
pub struct LatexExtractor;

impl LatexExtractor {
    /// Create a new LaTeX extractor
    pub fn new() -> Self {
        Self
    }

    /// Build the document structure from already-decoded source text
    pub fn parse_source(&self, source_path: &str, content: &str) -> DocumentStructure {
        let mut doc = DocumentStructure::new(source_path, DocumentType::Latex);

        for (key, re) in [("title", &*TITLE_RE), ("author", &*AUTHOR_RE), ("date", &*DATE_RE)] {
            if let Some(caps) = re.captures(content) {
                doc.metadata.insert(key.to_string(), clean_latex(&caps[1]));
            }
        }

        for (re, level) in SECTION_RES.iter() {
            for caps in re.captures_iter(content) {
                doc.structural_elements.push(StructuralElement::Heading {
                    level: *level,
                    text: clean_latex(&caps[1]),
                });
            }
        }

        for (re, float) in [(&*FIGURE_RE, FloatKind::Figure), (&*TABLE_RE, FloatKind::Table)] {
            for caps in re.captures_iter(content) {
                let body = &caps[1];
                doc.structural_elements.push(StructuralElement::Float {
                    float,
                    caption: CAPTION_RE
                        .captures(body)
                        .map(|c| clean_latex(&c[1]))
                        .unwrap_or_default(),
                    label: first_label(body),
                });
            }
        }

        for caps in EQUATION_RE.captures_iter(content) {
            let body = &caps[1];
            doc.structural_elements.push(StructuralElement::Equation {
                body: LABEL_RE.replace_all(body, "").trim().to_string(),
                label: first_label(body),
            });
        }

        let document_class = DOCUMENT_CLASS_RE
            .captures(content)
            .map(|c| Value::String(c[1].to_string()))
            .unwrap_or(Value::Null);

        let packages: Vec<String> = PACKAGE_RE
            .captures_iter(content)
            .flat_map(|c| {
                c[1].split(',')
                    .map(|p| p.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .collect();

        let citation_count = CITE_RE.find_iter(content).count();

        let fs = &mut doc.format_specific;
        fs.insert("document_class".to_string(), document_class);
        fs.insert("packages".to_string(), json!(packages));
        fs.insert(
            "has_bibliography".to_string(),
            json!(BIBLIOGRAPHY_RE.is_match(content)),
        );
        fs.insert("citation_count".to_string(), json!(citation_count));
        fs.insert("raw_content".to_string(), json!(content));

        debug!(
            "LaTeX structure: {} elements, {} citations",
            doc.structural_elements.len(),
            citation_count
        );

        doc
    }
}

impl FormatExtractor for LatexExtractor {
    fn supports_extension(&self, extension: &str) -> bool {
        extension_in(extension, EXTENSIONS)
    }

    fn parse(&self, path: &Path) -> Result<DocumentStructure, ExtractError> {
        let content = read_text_lossy(path, |e| self.supports_extension(e), "LaTeX")?;
        Ok(self.parse_source(&path.to_string_lossy(), &content))
    }
}

fn first_label(body: &str) -> String {
    LABEL_RE
        .captures(body)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

/// Strip formatting commands, keeping their text
///
/// Wrappers such as `\textbf{x}` and unknown one-argument commands resolve to
/// their argument, bare commands are dropped, braces are removed.
pub fn clean_latex(text: &str) -> String {
    let text = FORMATTING_RE.replace_all(text, "$1");
    let text = ONE_ARG_COMMAND_RE.replace_all(&text, "$1");
    let text = BARE_COMMAND_RE.replace_all(&text, "");
    text.replace(['{', '}'], "").trim().to_string()
}
