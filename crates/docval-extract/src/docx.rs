//! Word package (`.docx`) extractor
//!
//! A `.docx` file is a ZIP container of WordprocessingML parts. The body
//! comes from `word/document.xml`; style display names from
//! `word/styles.xml` and core properties from `docProps/core.xml`, both
//! optional.
//!
//! # Output
//!
//! - Every body paragraph becomes a paragraph with its style and run count;
//!   heading-styled ones (`Heading N`, `Title`) are preceded by a heading
//! - Text box content (`w:txbxContent`) is skipped; the anchoring paragraph
//!   keeps its own text
//! - Top-level tables become cell grids; a cell's paragraphs are joined
//!   with newlines
//! - `format_specific` carries `styles`, `sections` (page geometry),
//!   `has_header`/`has_footer` (first section only) and `xml_content`

use crate::source::{extension_in, read_source};
use docval_domain::{
    DocumentStructure, DocumentType, ExtractError, FormatExtractor, StructuralElement,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Extensions handled by [`DocxExtractor`]
pub const EXTENSIONS: &[&str] = &["docx"];

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const CORE_PART: &str = "docProps/core.xml";

/// Twentieths of a point per inch
const TWIPS_PER_INCH: f64 = 1440.0;

/// Style applied when a paragraph names none
const DEFAULT_STYLE: &str = "Normal";

/// Extractor for Word packages
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new docx extractor
    pub fn new() -> Self {
        Self
    }

    /// Build the document structure from an open package
    pub fn parse_package<R: Read + Seek>(
        &self,
        source_path: &str,
        reader: R,
    ) -> Result<DocumentStructure, ExtractError> {
        let mut archive = ZipArchive::new(reader).map_err(|e| {
            ExtractError::unsupported(source_path, format!("not a valid ZIP package: {}", e))
        })?;

        let document_bytes = read_part(&mut archive, DOCUMENT_PART).map_err(|e| {
            ExtractError::unsupported(source_path, format!("missing {}: {}", DOCUMENT_PART, e))
        })?;
        let document_xml = String::from_utf8_lossy(&document_bytes).into_owned();

        let styles = optional_part(&mut archive, STYLES_PART)
            .map(|xml| parse_style_names(&xml))
            .unwrap_or_default();

        let mut doc = DocumentStructure::new(source_path, DocumentType::Docx);
        doc.metadata = optional_part(&mut archive, CORE_PART)
            .map(|xml| parse_core_properties(&xml))
            .unwrap_or_default();
        for key in ["author", "title", "subject", "created", "modified"] {
            doc.metadata.entry(key.to_string()).or_default();
        }

        let mut walker = BodyWalker::new(&styles);
        walker
            .walk(&document_xml)
            .map_err(|reason| ExtractError::unsupported(source_path, reason))?;

        let (has_header, has_footer) = walker
            .sections
            .first()
            .map(|s| (s.has_header, s.has_footer))
            .unwrap_or((false, false));

        let fs = &mut doc.format_specific;
        fs.insert(
            "styles".to_string(),
            json!(walker.style_names.iter().collect::<Vec<_>>()),
        );
        fs.insert(
            "sections".to_string(),
            Value::Array(walker.sections.iter().map(SectionInfo::to_json).collect()),
        );
        fs.insert("has_header".to_string(), json!(has_header));
        fs.insert("has_footer".to_string(), json!(has_footer));
        fs.insert("xml_content".to_string(), json!(document_xml));

        doc.structural_elements = walker.elements;

        debug!(
            "docx structure: {} elements, {} sections",
            doc.structural_elements.len(),
            walker.sections.len()
        );

        Ok(doc)
    }
}

impl FormatExtractor for DocxExtractor {
    fn supports_extension(&self, extension: &str) -> bool {
        extension_in(extension, EXTENSIONS)
    }

    fn parse(&self, path: &Path) -> Result<DocumentStructure, ExtractError> {
        let bytes = read_source(path, |e| self.supports_extension(e), "Word")?;
        self.parse_package(&path.to_string_lossy(), Cursor::new(bytes))
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, String> {
    let mut file = archive.by_name(name).map_err(|e| e.to_string())?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(|e| e.to_string())?;
    Ok(buf)
}

/// Read an auxiliary part; absence or damage is not an error
fn optional_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Option<String> {
    match read_part(archive, name) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!("Skipping {}: {}", name, e);
            None
        }
    }
}

/// Value of an attribute, if present and decodable
fn attr(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .try_get_attribute(key)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Map style ids to display names from `word/styles.xml`
fn parse_style_names(xml: &str) -> HashMap<String, String> {
    let mut names = HashMap::new();
    let mut reader = Reader::from_str(xml);
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:style" => {
                current_id = attr(&e, b"w:styleId");
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:name" => {
                if let (Some(id), Some(name)) = (current_id.as_ref(), attr(&e, b"w:val")) {
                    names.insert(id.clone(), name);
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:style" => current_id = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!("Stopped reading styles: {}", e);
                break;
            }
            _ => {}
        }
    }

    names
}

/// Read author, title, subject and timestamps from `docProps/core.xml`
fn parse_core_properties(xml: &str) -> BTreeMap<String, String> {
    let mut props = BTreeMap::new();
    let mut reader = Reader::from_str(xml);
    let mut current: Option<&'static str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = match e.local_name().as_ref() {
                    b"creator" => Some("author"),
                    b"title" => Some("title"),
                    b"subject" => Some("subject"),
                    b"created" => Some("created"),
                    b"modified" => Some("modified"),
                    _ => None,
                };
            }
            Ok(Event::Text(t)) => {
                if let (Some(key), Ok(text)) = (current, t.unescape()) {
                    props
                        .entry(key.to_string())
                        .or_insert_with(String::new)
                        .push_str(&text);
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!("Stopped reading core properties: {}", e);
                break;
            }
            _ => {}
        }
    }

    props
}

/// Heading level encoded by a style name, if it is a heading style
fn heading_level(style_name: &str) -> Option<u8> {
    let lower = style_name.to_lowercase();
    if lower == "title" {
        return Some(0);
    }
    lower
        .strip_prefix("heading")
        .and_then(|rest| rest.trim().parse::<u8>().ok())
        .filter(|level| (1..=9).contains(level))
}

#[derive(Debug, Default)]
struct SectionInfo {
    page_width: Option<f64>,
    page_height: Option<f64>,
    orientation: Option<String>,
    has_header: bool,
    has_footer: bool,
}

impl SectionInfo {
    fn to_json(&self) -> Value {
        json!({
            "page_width": self.page_width,
            "page_height": self.page_height,
            "orientation": self.orientation.as_deref().unwrap_or("portrait"),
        })
    }
}

#[derive(Debug, Default)]
struct ParagraphState {
    text: String,
    style_id: Option<String>,
    runs: usize,
}

/// Event-driven walk over `word/document.xml`
struct BodyWalker<'a> {
    styles: &'a HashMap<String, String>,
    elements: Vec<StructuralElement>,
    style_names: BTreeSet<String>,
    sections: Vec<SectionInfo>,

    paragraph: Option<ParagraphState>,
    in_text: bool,
    text_box_depth: usize,

    table_depth: usize,
    rows: Vec<Vec<String>>,
    row: Option<Vec<String>>,
    cell: Option<Vec<String>>,

    section: Option<SectionInfo>,
}

impl<'a> BodyWalker<'a> {
    fn new(styles: &'a HashMap<String, String>) -> Self {
        Self {
            styles,
            elements: Vec::new(),
            style_names: BTreeSet::new(),
            sections: Vec::new(),
            paragraph: None,
            in_text: false,
            text_box_depth: 0,
            table_depth: 0,
            rows: Vec::new(),
            row: None,
            cell: None,
            section: None,
        }
    }

    fn walk(&mut self, xml: &str) -> Result<(), String> {
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => self.open(&e),
                Ok(Event::Empty(e)) => {
                    self.open(&e);
                    self.close(e.name().as_ref());
                }
                Ok(Event::End(e)) => self.close(e.name().as_ref()),
                Ok(Event::Text(t)) if self.in_text => {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    if let Some(p) = self.paragraph.as_mut() {
                        p.text.push_str(&text);
                    }
                }
                Ok(Event::Eof) => return Ok(()),
                Err(e) => {
                    return Err(format!(
                        "malformed {} at byte {}: {}",
                        DOCUMENT_PART,
                        reader.buffer_position(),
                        e
                    ))
                }
                _ => {}
            }
        }
    }

    fn open(&mut self, e: &BytesStart<'_>) {
        if self.text_box_depth > 0 {
            if e.name().as_ref() == b"w:txbxContent" {
                self.text_box_depth += 1;
            }
            return;
        }
        match e.name().as_ref() {
            b"w:txbxContent" => self.text_box_depth = 1,
            // Paragraphs of nested tables are not part of any outer cell
            b"w:p" if self.table_depth <= 1 => self.paragraph = Some(ParagraphState::default()),
            b"w:pStyle" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.style_id = attr(e, b"w:val");
                }
            }
            b"w:r" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.runs += 1;
                }
            }
            b"w:t" => self.in_text = self.paragraph.is_some(),
            b"w:tab" => self.push_text("\t"),
            b"w:br" | b"w:cr" => self.push_text("\n"),
            b"w:tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.rows.clear();
                }
            }
            b"w:tr" if self.table_depth == 1 => self.row = Some(Vec::new()),
            b"w:tc" if self.table_depth == 1 => self.cell = Some(Vec::new()),
            b"w:sectPr" => self.section = Some(SectionInfo::default()),
            b"w:pgSz" => {
                if let Some(s) = self.section.as_mut() {
                    s.page_width = attr(e, b"w:w")
                        .and_then(|v| v.parse::<f64>().ok())
                        .map(|v| v / TWIPS_PER_INCH);
                    s.page_height = attr(e, b"w:h")
                        .and_then(|v| v.parse::<f64>().ok())
                        .map(|v| v / TWIPS_PER_INCH);
                    s.orientation = attr(e, b"w:orient");
                }
            }
            b"w:headerReference" => {
                if let Some(s) = self.section.as_mut() {
                    s.has_header = true;
                }
            }
            b"w:footerReference" => {
                if let Some(s) = self.section.as_mut() {
                    s.has_footer = true;
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        if self.text_box_depth > 0 {
            if name == b"w:txbxContent" {
                self.text_box_depth -= 1;
            }
            return;
        }
        match name {
            b"w:p" => self.finish_paragraph(),
            b"w:t" => self.in_text = false,
            b"w:tc" if self.table_depth == 1 => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.push(cell.join("\n"));
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                if let Some(row) = self.row.take() {
                    self.rows.push(row);
                }
            }
            b"w:tbl" => {
                if self.table_depth == 1 {
                    let cells = std::mem::take(&mut self.rows);
                    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
                    self.elements.push(StructuralElement::Table {
                        rows: cells.len(),
                        columns,
                        cells,
                    });
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            b"w:sectPr" => {
                if let Some(section) = self.section.take() {
                    self.sections.push(section);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(p) = self.paragraph.as_mut() {
            p.text.push_str(text);
        }
    }

    fn finish_paragraph(&mut self) {
        let Some(paragraph) = self.paragraph.take() else {
            return;
        };

        if self.table_depth > 0 {
            if let Some(cell) = self.cell.as_mut() {
                cell.push(paragraph.text);
            }
            return;
        }

        let style = paragraph
            .style_id
            .map(|id| self.styles.get(&id).cloned().unwrap_or(id))
            .unwrap_or_else(|| DEFAULT_STYLE.to_string());
        self.style_names.insert(style.clone());

        if let Some(level) = heading_level(&style) {
            self.elements.push(StructuralElement::Heading {
                level,
                text: paragraph.text.clone(),
            });
        }
        self.elements.push(StructuralElement::Paragraph {
            text: paragraph.text,
            style: Some(style),
            runs: Some(paragraph.runs),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("Heading 1"), Some(1));
        assert_eq!(heading_level("heading 3"), Some(3));
        assert_eq!(heading_level("Title"), Some(0));
        assert_eq!(heading_level("Normal"), None);
        assert_eq!(heading_level("Heading"), None);
    }

    #[test]
    fn test_style_names() {
        let xml = r#"<w:styles xmlns:w="w">
            <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
            <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
        </w:styles>"#;
        let names = parse_style_names(xml);
        assert_eq!(names.get("Heading1").map(String::as_str), Some("heading 1"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_core_properties() {
        let xml = r#"<cp:coreProperties xmlns:cp="cp" xmlns:dc="dc" xmlns:dcterms="dcterms">
            <dc:title>Annual Report</dc:title>
            <dc:creator>Jane Doe</dc:creator>
            <dcterms:created>2024-01-02T03:04:05Z</dcterms:created>
        </cp:coreProperties>"#;
        let props = parse_core_properties(xml);
        assert_eq!(props["title"], "Annual Report");
        assert_eq!(props["author"], "Jane Doe");
        assert_eq!(props["created"], "2024-01-02T03:04:05Z");
        assert!(!props.contains_key("modified"));
    }

    #[test]
    fn test_walker_paragraphs_and_tables() {
        let xml = r#"<w:document xmlns:w="w"><w:body>
            <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>
            <w:tbl>
              <w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr>
            </w:tbl>
            <w:p/>
            <w:sectPr><w:headerReference w:type="default" r:id="rId1"/><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>
        </w:body></w:document>"#;
        let mut styles = HashMap::new();
        styles.insert("Heading1".to_string(), "Heading 1".to_string());

        let mut walker = BodyWalker::new(&styles);
        walker.walk(xml).unwrap();

        assert_eq!(
            walker.elements,
            vec![
                StructuralElement::Heading {
                    level: 1,
                    text: "Intro".to_string()
                },
                StructuralElement::Paragraph {
                    text: "Intro".to_string(),
                    style: Some("Heading 1".to_string()),
                    runs: Some(1),
                },
                StructuralElement::Paragraph {
                    text: "Hello world".to_string(),
                    style: Some("Normal".to_string()),
                    runs: Some(2),
                },
                StructuralElement::Table {
                    rows: 1,
                    columns: 2,
                    cells: vec![vec!["a".to_string(), "b".to_string()]],
                },
                StructuralElement::Paragraph {
                    text: String::new(),
                    style: Some("Normal".to_string()),
                    runs: Some(0),
                },
            ]
        );

        assert_eq!(walker.sections.len(), 1);
        assert!(walker.sections[0].has_header);
        assert!(!walker.sections[0].has_footer);
        assert_eq!(walker.sections[0].page_width, Some(8.5));
        assert_eq!(walker.sections[0].page_height, Some(11.0));
    }

    #[test]
    fn test_walker_skips_text_box_content() {
        let xml = r#"<w:document xmlns:w="w" xmlns:mc="mc" xmlns:wps="wps" xmlns:v="v"><w:body>
            <w:p>
              <w:r><w:t xml:space="preserve">Outer before </w:t></w:r>
              <w:r><mc:AlternateContent>
                <mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent>
                  <w:p><w:r><w:t>Inside box</w:t></w:r></w:p>
                </w:txbxContent></wps:txbx></w:drawing></mc:Choice>
                <mc:Fallback><w:pict><v:textbox><w:txbxContent>
                  <w:p><w:r><w:t>Inside box</w:t></w:r></w:p>
                </w:txbxContent></v:textbox></w:pict></mc:Fallback>
              </mc:AlternateContent></w:r>
              <w:r><w:t>outer after</w:t></w:r>
            </w:p>
            <w:p><w:r><w:t>Next</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let styles = HashMap::new();
        let mut walker = BodyWalker::new(&styles);
        walker.walk(xml).unwrap();

        assert_eq!(
            walker.elements,
            vec![
                StructuralElement::Paragraph {
                    text: "Outer before outer after".to_string(),
                    style: Some("Normal".to_string()),
                    runs: Some(3),
                },
                StructuralElement::Paragraph {
                    text: "Next".to_string(),
                    style: Some("Normal".to_string()),
                    runs: Some(1),
                },
            ]
        );
    }

    #[test]
    fn test_walker_rejects_malformed_xml() {
        let styles = HashMap::new();
        let mut walker = BodyWalker::new(&styles);
        assert!(walker.walk("<w:body><w:p></w:body>").is_err());
    }

    #[test]
    fn test_supports_extension() {
        let extractor = DocxExtractor::new();
        assert!(extractor.supports_extension(".docx"));
        assert!(extractor.supports_extension(".DOCX"));
        assert!(!extractor.supports_extension(".html"));
        assert!(!extractor.supports_extension(".tex"));
    }
}
