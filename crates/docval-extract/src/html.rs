//! HTML extractor

use crate::source::{extension_in, read_text_lossy};
use docval_domain::{
    DocumentStructure, DocumentType, ExtractError, FormatExtractor, StructuralElement,
};
use scraper::{ElementRef, Html, Selector};
use serde_json::json;
use std::path::Path;
use tracing::debug;

/// Extensions handled by [`HtmlExtractor`]
pub const EXTENSIONS: &[&str] = &["html", "htm"];

/// Extractor for HTML pages
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    /// Create a new HTML extractor
    pub fn new() -> Self {
        Self
    }

    /// Build the document structure from already-decoded markup
    pub fn parse_source(
        &self,
        source_path: &str,
        content: &str,
    ) -> Result<DocumentStructure, ExtractError> {
        let page = Html::parse_document(content);
        let select = |css: &str| {
            Selector::parse(css).map_err(|e| {
                ExtractError::unsupported(source_path, format!("selector '{}': {}", css, e))
            })
        };

        let mut doc = DocumentStructure::new(source_path, DocumentType::Html);

        let title = page
            .select(&select("title")?)
            .next()
            .map(|t| t.text().collect::<String>())
            .unwrap_or_default();
        doc.metadata.insert("title".to_string(), title.clone());

        for name in ["author", "description"] {
            let meta = select(&format!(r#"meta[name="{}"]"#, name))?;
            if let Some(tag) = page.select(&meta).next() {
                let content = tag.value().attr("content").unwrap_or_default();
                doc.metadata.insert(name.to_string(), content.to_string());
            }
        }

        // Grouped by level, document order within a level
        for level in 1..=6u8 {
            for heading in page.select(&select(&format!("h{}", level))?) {
                doc.structural_elements.push(StructuralElement::Heading {
                    level,
                    text: stripped_text(heading),
                });
            }
        }

        for para in page.select(&select("p")?) {
            doc.structural_elements.push(StructuralElement::Paragraph {
                text: stripped_text(para),
                style: None,
                runs: None,
            });
        }

        let row_selector = select("tr")?;
        let cell_selector = select("td, th")?;
        for table in page.select(&select("table")?) {
            let cells: Vec<Vec<String>> = table
                .select(&row_selector)
                .map(|row| row.select(&cell_selector).map(stripped_text).collect())
                .collect();
            let columns = cells.last().map(Vec::len).unwrap_or(0);
            doc.structural_elements.push(StructuralElement::Table {
                rows: cells.len(),
                columns,
                cells,
            });
        }

        let item_selector = select("li")?;
        for (css, ordered) in [("ul", false), ("ol", true)] {
            for list in page.select(&select(css)?) {
                doc.structural_elements.push(StructuralElement::List {
                    ordered,
                    items: list.select(&item_selector).map(stripped_text).collect(),
                });
            }
        }

        doc.format_specific
            .insert("has_title".to_string(), json!(!title.is_empty()));
        doc.format_specific
            .insert("raw_content".to_string(), json!(content));

        debug!(
            "HTML structure: {} elements, title present: {}",
            doc.structural_elements.len(),
            !title.is_empty()
        );

        Ok(doc)
    }
}

impl FormatExtractor for HtmlExtractor {
    fn supports_extension(&self, extension: &str) -> bool {
        extension_in(extension, EXTENSIONS)
    }

    fn parse(&self, path: &Path) -> Result<DocumentStructure, ExtractError> {
        let content = read_text_lossy(path, |e| self.supports_extension(e), "HTML")?;
        self.parse_source(&path.to_string_lossy(), &content)
    }
}

/// Concatenate the element's text nodes, each trimmed, skipping blanks
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Test Document</title>
  <meta name="author" content="Test Author">
</head>
<body>
  <h2>Details</h2>
  <h1>Main Heading</h1>
  <p>First paragraph with <b>bold</b> text.</p>
  <p>Second paragraph.</p>
  <table>
    <tr><th>Name</th><th>Value</th></tr>
    <tr><td>a</td><td>1</td></tr>
  </table>
  <ol><li>one</li><li>two</li></ol>
  <ul><li>bullet</li></ul>
</body>
</html>"#;

    fn parse(content: &str) -> DocumentStructure {
        HtmlExtractor::new().parse_source("page.html", content).unwrap()
    }

    #[test]
    fn test_basic_page() {
        let doc = parse(PAGE);

        assert_eq!(doc.document_type, DocumentType::Html);
        assert_eq!(doc.metadata["title"], "Test Document");
        assert_eq!(doc.metadata["author"], "Test Author");
        assert!(!doc.metadata.contains_key("description"));
        assert_eq!(doc.format_specific["has_title"], json!(true));
        assert_eq!(doc.format_specific["raw_content"], json!(PAGE));
    }

    #[test]
    fn test_headings_grouped_by_level() {
        let doc = parse(PAGE);
        let headings: Vec<_> = doc.headings().collect();
        assert_eq!(headings, vec![(1, "Main Heading"), (2, "Details")]);
    }

    #[test]
    fn test_paragraph_text_is_stripped() {
        let doc = parse(PAGE);
        let paragraphs: Vec<_> = doc
            .structural_elements
            .iter()
            .filter_map(|e| match e {
                StructuralElement::Paragraph { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            paragraphs,
            vec!["First paragraph withboldtext.", "Second paragraph."]
        );
    }

    #[test]
    fn test_tables_and_lists() {
        let doc = parse(PAGE);

        let table = doc
            .structural_elements
            .iter()
            .find(|e| matches!(e, StructuralElement::Table { .. }))
            .unwrap();
        assert_eq!(
            table,
            &StructuralElement::Table {
                rows: 2,
                columns: 2,
                cells: vec![
                    vec!["Name".to_string(), "Value".to_string()],
                    vec!["a".to_string(), "1".to_string()],
                ],
            }
        );

        let lists: Vec<_> = doc
            .structural_elements
            .iter()
            .filter_map(|e| match e {
                StructuralElement::List { ordered, items } => Some((*ordered, items.len())),
                _ => None,
            })
            .collect();
        // Unordered lists first, then ordered
        assert_eq!(lists, vec![(false, 1), (true, 2)]);
    }

    #[test]
    fn test_missing_title() {
        let doc = parse("<html><body><p>x</p></body></html>");
        assert_eq!(doc.metadata["title"], "");
        assert_eq!(doc.format_specific["has_title"], json!(false));
    }

    #[test]
    fn test_supports_extension() {
        let extractor = HtmlExtractor::new();
        assert!(extractor.supports_extension(".html"));
        assert!(extractor.supports_extension(".htm"));
        assert!(extractor.supports_extension(".HTML"));
        assert!(!extractor.supports_extension(".docx"));
        assert!(!extractor.supports_extension(".tex"));
    }
}
