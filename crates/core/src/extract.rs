//! Plain-text extraction from uploaded reference documents.
//!
//! Supported formats are chosen by file extension:
//! - `.pdf` via `pdf-extract`
//! - `.docx` by reading `word/document.xml` out of the ZIP container
//! - `.txt`, `.md`, `.markdown` as (lossy) UTF-8
//!
//! Extracted text never contains NUL characters, which Postgres rejects in
//! `TEXT` columns.

use std::io::{Cursor, Read};

use quick_xml::events::Event;

/// Document formats we know how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Detect the document kind from a file name's extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "md" | "markdown" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Failed to extract PDF text: {0}")]
    Pdf(String),

    #[error("Invalid DOCX: {0}")]
    Docx(String),

    #[error("File contains no extractable text")]
    Empty,
}

/// Extract text from an uploaded file, picking the parser by extension.
pub fn extract_text(filename: &str, data: &[u8]) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_filename(filename)
        .ok_or_else(|| ExtractError::Unsupported(filename.to_string()))?;

    let text = match kind {
        DocumentKind::Pdf => extract_pdf(data)?,
        DocumentKind::Docx => extract_docx(data)?,
        DocumentKind::PlainText => String::from_utf8_lossy(data).into_owned(),
    };

    let text = strip_nul(&text).trim().to_string();
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

/// Drop NUL characters from text bound for the database.
pub fn strip_nul(text: &str) -> String {
    text.replace('\0', "")
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed documents instead of returning an error.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
        .map_err(|_| ExtractError::Pdf("document could not be parsed".into()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    // pdf-extract separates pages with form feeds.
    Ok(text.replace('\x0c', "\n\n"))
}

/// Collect the text runs (`<w:t>`) of every paragraph (`<w:p>`), one
/// paragraph per line.
pub fn extract_docx(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| ExtractError::Docx(format!("not a ZIP container: {e}")))?;

    let mut doc_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractError::Docx("missing word/document.xml".into()))?
        .read_to_string(&mut doc_xml)
        .map_err(|e| ExtractError::Docx(format!("unreadable document.xml: {e}")))?;

    let mut reader = quick_xml::Reader::from_str(&doc_xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Docx(format!("bad text run: {e}")))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(format!("XML parse error: {e}"))),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    /// One-page PDF with a valid xref table whose content stream selects
    /// `/F1` while the page declares no font resources.
    fn pdf_with_unresolved_font() -> String {
        let content = "BT /F1 12 Tf 72 720 Td (Hello) Tj ET";
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }
        let xref = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf
    }

    #[test]
    fn kind_is_detected_from_extension() {
        assert_eq!(DocumentKind::from_filename("spec.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("a.b.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_filename("notes.md"), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_filename("image.png"), None);
        assert_eq!(DocumentKind::from_filename("README"), None);
    }

    #[test]
    fn plain_text_is_trimmed() {
        let text = extract_text("notes.txt", b"\n  Kickoff notes\n").unwrap();
        assert_eq!(text, "Kickoff notes");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let text = extract_text("notes.txt", &[b'o', b'k', 0xff]).unwrap();
        assert!(text.starts_with("ok"));
    }

    #[test]
    fn nul_characters_are_dropped() {
        let text = extract_text("notes.txt", b"bad\0text\0").unwrap();
        assert_eq!(text, "badtext");
        assert!(matches!(extract_text("nul.txt", b"\0\0"), Err(ExtractError::Empty)));
    }

    #[test]
    fn pdf_with_unresolvable_font_is_an_error() {
        let err = extract_text("broken.pdf", pdf_with_unresolved_font().as_bytes()).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn garbage_pdf_is_an_error() {
        assert!(matches!(
            extract_text("fake.pdf", b"definitely not a pdf"),
            Err(ExtractError::Pdf(_))
        ));
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(extract_text("blank.txt", b"   \n"), Err(ExtractError::Empty)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        assert!(matches!(
            extract_text("diagram.png", b"\x89PNG"),
            Err(ExtractError::Unsupported(name)) if name == "diagram.png"
        ));
    }

    #[test]
    fn docx_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Login</w:t></w:r><w:r><w:t xml:space="preserve"> &amp; signup</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>
    <w:p></w:p>
  </w:body>
</w:document>"#;
        let text = extract_text("requirements.docx", &build_docx(xml)).unwrap();
        assert_eq!(text, "Login & signup\nSecond paragraph");
    }

    #[test]
    fn docx_without_document_xml_is_rejected() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_text("broken.docx", &buf.into_inner()).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(msg) if msg.contains("document.xml")));
    }

    #[test]
    fn non_zip_docx_is_rejected() {
        assert!(matches!(
            extract_text("fake.docx", b"plain text pretending"),
            Err(ExtractError::Docx(_))
        ));
    }
}
