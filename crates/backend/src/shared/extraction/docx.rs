//! Сырой текст из Word (.docx) без форматирования.
//!
//! Документ это zip-архив, текст лежит в `word/document.xml`. Берём содержимое
//! `w:t` внутри прогонов, `w:tab` и `w:br`/`w:cr` превращаем в `\t` и `\n`,
//! после каждого абзаца ставим пустую строку.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use thiserror::Error;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a valid .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read word/document.xml: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document XML: {0}")]
    Xml(String),
}

pub fn extract(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
    document_text(&xml)
}

fn document_text(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocxError::Xml(e.to_string()))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                b"w:p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                // w:tab внутри w:tabs это настройка абзаца, а не символ
                b"w:tab" if run_depth > 0 => out.push('\t'),
                b"w:br" | b"w:cr" if run_depth > 0 => out.push('\n'),
                b"w:p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| DocxError::Xml(e.to_string()))?;
                out.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Минимальный .docx с заданным содержимым `w:body`
    pub(crate) fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Hello</w:t></w:r></w:p><w:p><w:r><w:t>World</w:t></w:r></w:p>",
        );
        assert_eq!(extract(&bytes).unwrap(), "Hello\n\nWorld\n\n");
    }

    #[test]
    fn test_formatting_is_dropped() {
        let bytes = docx_with_body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">bold </w:t></w:r><w:r><w:t>and</w:t><w:tab/><w:t>tabbed</w:t><w:br/><w:t>a &amp; b</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract(&bytes).unwrap(), "bold and\ttabbed\na & b\n\n");
    }

    #[test]
    fn test_empty_paragraph() {
        let bytes = docx_with_body("<w:p/><w:p><w:r><w:t>x</w:t></w:r></w:p>");
        assert_eq!(extract(&bytes).unwrap(), "\n\nx\n\n");
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            extract(b"plain bytes"),
            Err(DocxError::Archive(_))
        ));
    }
}
