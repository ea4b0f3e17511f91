//! Error types for document ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a document cannot be read as tabular content.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The document could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither the extension nor the content identify a supported format.
    #[error("unsupported document format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// HTML content without any `<table>` element.
    #[error("no tables found in HTML document")]
    NoTables,

    /// The PDF could not be parsed.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF parser aborted on malformed content.
    #[error("PDF parser aborted on malformed content: {0}")]
    PdfPanicked(String),

    /// The PDF parsed but carried no extractable text.
    #[error("PDF contains no extractable text")]
    EmptyPdf,

    /// UTF-8 decoding was requested but the bytes are not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
