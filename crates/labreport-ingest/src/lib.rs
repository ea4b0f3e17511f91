#![deny(unsafe_code)]

pub mod document;
pub mod error;
pub mod html;
pub mod pdf;

pub use document::{
    DocumentKind, ReadOptions, SourceDocument, TextEncoding, decode_text, detect_kind,
    parse_document, read_document,
};
pub use error::{IngestError, Result};
pub use html::extract_tables;
pub use pdf::{Glyph, PdfLayoutOptions, extract_pdf_tables, extract_pdf_tables_with, rows_from_glyphs};
