//! Document-kind detection, decoding, and dispatch to the format readers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use labreport_model::SourceTable;

use crate::error::{IngestError, Result};
use crate::html::extract_tables;
use crate::pdf::extract_pdf_tables;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Html,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
        }
    }
}

/// Character encoding for HTML exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// ISO-8859-1, the encoding lab-instrument exports are written in.
    #[default]
    Latin1,
    Utf8,
    /// UTF-8 when the bytes are valid UTF-8, Latin-1 otherwise.
    Auto,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub encoding: TextEncoding,
}

/// A document reduced to its tables.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub tables: Vec<SourceTable>,
}

impl SourceDocument {
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|t| t.rows.len()).sum()
    }
}

/// Identifies the format from magic bytes, then extension, then a leading tag.
pub fn detect_kind(path: &Path, bytes: &[u8]) -> Result<DocumentKind> {
    if bytes.starts_with(PDF_MAGIC) {
        return Ok(DocumentKind::Pdf);
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => return Ok(DocumentKind::Pdf),
        Some("html" | "htm") => return Ok(DocumentKind::Html),
        _ => {}
    }
    let body = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    if body.trim_ascii_start().starts_with(b"<") {
        return Ok(DocumentKind::Html);
    }
    Err(IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

pub fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Result<String> {
    match encoding {
        TextEncoding::Latin1 => Ok(decode_latin1(bytes)),
        TextEncoding::Utf8 => Ok(std::str::from_utf8(bytes)?.to_string()),
        TextEncoding::Auto => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => Ok(decode_latin1(bytes)),
        },
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Parses in-memory document bytes; `path` is used for detection and errors.
pub fn parse_document(path: &Path, bytes: &[u8], options: &ReadOptions) -> Result<SourceDocument> {
    let kind = detect_kind(path, bytes)?;
    debug!(path = %path.display(), kind = kind.as_str(), size = bytes.len(), "detected document");
    let tables = match kind {
        DocumentKind::Pdf => extract_pdf_tables(bytes)?,
        DocumentKind::Html => {
            let html = decode_text(bytes, options.encoding)?;
            extract_tables(&html)?
        }
    };
    let document = SourceDocument {
        path: path.to_path_buf(),
        kind,
        tables,
    };
    info!(
        path = %path.display(),
        kind = kind.as_str(),
        tables = document.tables.len(),
        rows = document.row_count(),
        "document read"
    );
    Ok(document)
}

pub fn read_document(path: &Path, options: &ReadOptions) -> Result<SourceDocument> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &bytes, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_win_over_extension() {
        let kind = detect_kind(Path::new("report.html"), b"%PDF-1.4\n...").unwrap();
        assert_eq!(kind, DocumentKind::Pdf);
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(
            detect_kind(Path::new("REPORT.HTM"), b"").unwrap(),
            DocumentKind::Html
        );
    }

    #[test]
    fn markup_sniffing_without_extension() {
        assert_eq!(
            detect_kind(Path::new("export"), b"\xef\xbb\xbf  <html>").unwrap(),
            DocumentKind::Html
        );
        assert!(detect_kind(Path::new("notes.txt"), b"plain").is_err());
    }

    #[test]
    fn latin1_maps_bytes_to_code_points() {
        let text = decode_text(b"Gluc\xe1gon", TextEncoding::Latin1).unwrap();
        assert_eq!(text, "Glucágon");
    }

    #[test]
    fn auto_prefers_utf8() {
        let utf8 = "Glucagón".as_bytes();
        assert_eq!(decode_text(utf8, TextEncoding::Auto).unwrap(), "Glucagón");
        assert_eq!(
            decode_text(b"Glucag\xf3n", TextEncoding::Auto).unwrap(),
            "Glucagón"
        );
        assert!(decode_text(b"Glucag\xf3n", TextEncoding::Utf8).is_err());
    }
}
