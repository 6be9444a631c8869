//! Integration tests for docval-extract
//!
//! These tests write real files to a temporary directory and go through the
//! registry the way the validation engine does.

use docval_domain::{DocumentType, ExtractError, FormatExtractor, StructuralElement};
use docval_extract::{DocxExtractor, ExtractorRegistry};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:body>
    <w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Quarterly Review</w:t></w:r></w:p>
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Summary</w:t></w:r></w:p>
    <w:p><w:r><w:t>Revenue grew.</w:t></w:r><w:r><w:tab/><w:t>Costs fell.</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Region</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>Total</w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>North</w:t></w:r></w:p><w:p><w:r><w:t>East</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>42</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
    <w:sectPr>
      <w:footerReference w:type="default" r:id="rId8"/>
      <w:pgSz w:w="15840" w:h="12240" w:orient="landscape"/>
    </w:sectPr>
  </w:body>
</w:document>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="Heading 1"/></w:style>
</w:styles>"#;

const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:dcterms="http://purl.org/dc/terms/">
  <dc:title>Quarterly Review</dc:title>
  <dc:creator>Finance Team</dc:creator>
  <dcterms:modified>2024-05-01T09:00:00Z</dcterms:modified>
</cp:coreProperties>"#;

fn write_package(dir: &Path, name: &str, parts: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = fs::File::create(&path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (part, content) in parts {
        zip.start_file(*part, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
}

fn write_text(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_docx_full_package() {
    let dir = TempDir::new().unwrap();
    let path = write_package(
        dir.path(),
        "review.docx",
        &[
            ("word/document.xml", DOCUMENT_XML),
            ("word/styles.xml", STYLES_XML),
            ("docProps/core.xml", CORE_XML),
        ],
    );

    let registry = ExtractorRegistry::default();
    let doc = registry.detect(&path).unwrap().parse(&path).unwrap();

    assert_eq!(doc.document_type, DocumentType::Docx);
    assert_eq!(doc.metadata["title"], "Quarterly Review");
    assert_eq!(doc.metadata["author"], "Finance Team");
    assert_eq!(doc.metadata["subject"], "");
    assert_eq!(doc.metadata["modified"], "2024-05-01T09:00:00Z");
    assert_eq!(doc.metadata["created"], "");

    let headings: Vec<_> = doc.headings().collect();
    assert_eq!(headings, vec![(0, "Quarterly Review"), (1, "Summary")]);

    assert!(doc.structural_elements.contains(&StructuralElement::Paragraph {
        text: "Revenue grew.\tCosts fell.".to_string(),
        style: Some("Normal".to_string()),
        runs: Some(2),
    }));

    assert!(doc.structural_elements.contains(&StructuralElement::Table {
        rows: 2,
        columns: 2,
        cells: vec![
            vec!["Region".to_string(), "Total".to_string()],
            vec!["North\nEast".to_string(), "42".to_string()],
        ],
    }));

    // Heading paragraphs keep their style and runs; table paragraphs are not body paragraphs
    assert!(doc.structural_elements.contains(&StructuralElement::Paragraph {
        text: "Summary".to_string(),
        style: Some("Heading 1".to_string()),
        runs: Some(1),
    }));
    let paragraph_count = doc.count_elements(|e| matches!(e, StructuralElement::Paragraph { .. }));
    assert_eq!(paragraph_count, 3);

    let fs = &doc.format_specific;
    assert_eq!(fs["styles"], json!(["Heading 1", "Normal", "Title"]));
    assert_eq!(
        fs["sections"],
        json!([{ "page_width": 11.0, "page_height": 8.5, "orientation": "landscape" }])
    );
    assert_eq!(fs["has_header"], json!(false));
    assert_eq!(fs["has_footer"], json!(true));
    assert_eq!(fs["xml_content"], json!(DOCUMENT_XML));
}

#[test]
fn test_docx_without_auxiliary_parts() {
    let dir = TempDir::new().unwrap();
    let body = r#"<w:document xmlns:w="w"><w:body>
        <w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Plain</w:t></w:r></w:p>
    </w:body></w:document>"#;
    let path = write_package(dir.path(), "bare.docx", &[("word/document.xml", body)]);

    let doc = DocxExtractor::new().parse(&path).unwrap();

    assert_eq!(doc.metadata["author"], "");
    assert_eq!(doc.metadata["title"], "");
    assert_eq!(doc.metadata["subject"], "");
    assert_eq!(doc.metadata["created"], "");
    assert_eq!(doc.metadata["modified"], "");
    // Without styles.xml the style id is used as the name, and the built-in
    // heading ids still mark headings
    assert_eq!(
        doc.structural_elements,
        vec![
            StructuralElement::Heading {
                level: 2,
                text: "Plain".to_string(),
            },
            StructuralElement::Paragraph {
                text: "Plain".to_string(),
                style: Some("Heading2".to_string()),
                runs: Some(1),
            },
        ]
    );
    assert_eq!(doc.format_specific["sections"], json!([]));
    assert_eq!(doc.format_specific["has_header"], json!(false));
}

#[test]
fn test_docx_rejects_non_zip() {
    let dir = TempDir::new().unwrap();
    let path = write_text(dir.path(), "fake.docx", "this is not a zip archive");

    let err = DocxExtractor::new().parse(&path).unwrap_err();
    assert!(matches!(err, ExtractError::Unsupported { .. }));
}

#[test]
fn test_docx_rejects_package_without_body() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "empty.docx", &[("word/styles.xml", STYLES_XML)]);

    let err = DocxExtractor::new().parse(&path).unwrap_err();
    match err {
        ExtractError::Unsupported { reason, .. } => assert!(reason.contains("word/document.xml")),
        other => panic!("expected Unsupported, got {}", other),
    }
}

#[test]
fn test_html_file_through_registry() {
    let dir = TempDir::new().unwrap();
    let path = write_text(
        dir.path(),
        "index.HTM",
        "<html><head><title>Home</title></head><body><h1>Welcome</h1></body></html>",
    );

    let registry = ExtractorRegistry::default();
    let doc = registry.detect(&path).unwrap().parse(&path).unwrap();

    assert_eq!(doc.document_type, DocumentType::Html);
    assert_eq!(doc.metadata["title"], "Home");
    assert_eq!(doc.headings().collect::<Vec<_>>(), vec![(1, "Welcome")]);
    assert_eq!(doc.source_path, path.to_string_lossy());
}

#[test]
fn test_latex_invalid_utf8_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("paper.tex");
    let mut bytes = b"\\title{Caf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"}\n\\section{Start}\n");
    fs::write(&path, bytes).unwrap();

    let registry = ExtractorRegistry::default();
    let doc = registry.get("latex").unwrap().parse(&path).unwrap();

    assert_eq!(doc.metadata["title"], "Caf\u{FFFD}");
    assert_eq!(doc.headings().collect::<Vec<_>>(), vec![(1, "Start")]);
}

#[test]
fn test_explicit_extractor_rejects_foreign_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_text(dir.path(), "notes.tex", r"\section{A}");

    let registry = ExtractorRegistry::default();
    let err = registry.get("html").unwrap().parse(&path).unwrap_err();
    assert!(matches!(err, ExtractError::Unsupported { .. }));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.docx");

    let registry = ExtractorRegistry::default();
    let err = registry.detect(&path).unwrap().parse(&path).unwrap_err();
    assert!(matches!(err, ExtractError::NotFound(_)));
}

#[test]
fn test_detect_unknown_extension() {
    let registry = ExtractorRegistry::default();
    let err = registry
        .detect(Path::new("report.pdf"))
        .err()
        .expect("no extractor claims .pdf");
    assert_eq!(
        err.to_string(),
        "Unknown format '.pdf'. Supported: .docx, .html, .htm, .tex, .latex"
    );
}
