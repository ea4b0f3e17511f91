//! Exporters for result tables.

#![deny(unsafe_code)]

pub mod common;
pub mod error;
pub mod export;
pub mod pdf;

pub use common::{ReportRow, report_rows};
pub use error::{ReportError, Result};
pub use export::{to_csv_string, to_json_string, write_csv};
pub use pdf::{REPORT_TITLE, render_pdf, render_pdf_with_title, write_pdf};
