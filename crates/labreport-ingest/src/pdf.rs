//! PDF table reader.
//!
//! Glyph positions are collected through a `pdf-extract` output device, then
//! regrouped into lines by baseline and into cells by horizontal gaps, so PDF
//! reports go through the same row layout as HTML exports.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, warn};

use labreport_model::SourceTable;

use crate::error::{IngestError, Result};

/// Grouping tolerances, in multiples of the glyph size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayoutOptions {
    /// Maximum baseline drift for two glyphs to share a line.
    pub line_tolerance: f64,
    /// Horizontal gap that reads as a space inside a cell.
    pub word_gap: f64,
    /// Horizontal gap that starts a new cell.
    pub cell_gap: f64,
}

impl Default for PdfLayoutOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 0.5,
            word_gap: 0.15,
            cell_gap: 1.0,
        }
    }
}

/// One rendered glyph in page space, `top` measured down from the page top.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub size: f64,
}

impl Glyph {
    pub fn new(text: impl Into<String>, x0: f64, x1: f64, top: f64, size: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            top,
            size,
        }
    }
}

#[derive(Default)]
struct GlyphCollector {
    pages: Vec<Vec<Glyph>>,
    page_height: f64,
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        self.page_height = media_box.ury - media_box.lly;
        self.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        text: &str,
    ) -> std::result::Result<(), OutputError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let scale_x = font_size * (trm.m11 + trm.m21);
        let scale_y = font_size * (trm.m12 + trm.m22);
        let size = (scale_x * scale_y).abs().sqrt();
        let x0 = trm.m31;
        let glyph = Glyph::new(text, x0, x0 + width * size, self.page_height - trm.m32, size);
        if let Some(page) = self.pages.last_mut() {
            page.push(glyph);
        }
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}

/// Groups one page of glyphs into rows of cell strings, top to bottom.
pub fn rows_from_glyphs(mut glyphs: Vec<Glyph>, options: &PdfLayoutOptions) -> Vec<Vec<String>> {
    glyphs.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));

    let mut lines: Vec<Vec<Glyph>> = Vec::new();
    for glyph in glyphs {
        match lines.last_mut() {
            Some(line)
                if (glyph.top - line[0].top).abs()
                    <= options.line_tolerance * glyph.size.max(line[0].size) =>
            {
                line.push(glyph);
            }
            _ => lines.push(vec![glyph]),
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            cells_from_line(&line, options)
        })
        .collect()
}

fn cells_from_line(line: &[Glyph], options: &PdfLayoutOptions) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut last_end: Option<f64> = None;
    for glyph in line {
        if let Some(end) = last_end {
            let gap = glyph.x0 - end;
            if gap > options.cell_gap * glyph.size {
                cells.push(std::mem::take(&mut current));
            } else if gap > options.word_gap * glyph.size {
                current.push(' ');
            }
        }
        current.push_str(&glyph.text);
        last_end = Some(last_end.map_or(glyph.x1, |end| end.max(glyph.x1)));
    }
    if !current.is_empty() {
        cells.push(current);
    }
    cells
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn collect_glyphs(bytes: &[u8]) -> Result<Vec<Vec<Glyph>>> {
    let mut document = Document::load_mem(bytes).map_err(|e| IngestError::Pdf(e.to_string()))?;
    if document.is_encrypted() {
        document
            .decrypt("")
            .map_err(|e| IngestError::Pdf(e.to_string()))?;
    }
    let mut collector = GlyphCollector::default();
    pdf_extract::output_doc(&document, &mut collector)
        .map_err(|e| IngestError::Pdf(e.to_string()))?;
    Ok(collector.pages)
}

/// [`extract_pdf_tables_with`] under the default layout tolerances.
pub fn extract_pdf_tables(bytes: &[u8]) -> Result<Vec<SourceTable>> {
    extract_pdf_tables_with(bytes, &PdfLayoutOptions::default())
}

/// One table per page, one row per text line, cells split on wide gaps.
///
/// # Errors
///
/// [`IngestError::Pdf`] when the bytes cannot be parsed,
/// [`IngestError::PdfPanicked`] when the parser aborts on malformed content,
/// and [`IngestError::EmptyPdf`] when no page has any text.
pub fn extract_pdf_tables_with(
    bytes: &[u8],
    options: &PdfLayoutOptions,
) -> Result<Vec<SourceTable>> {
    let pages = match catch_unwind(AssertUnwindSafe(|| collect_glyphs(bytes))) {
        Ok(pages) => pages?,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(%message, "PDF parser aborted");
            return Err(IngestError::PdfPanicked(message));
        }
    };
    if pages.iter().all(Vec::is_empty) {
        return Err(IngestError::EmptyPdf);
    }
    let tables: Vec<SourceTable> = pages
        .into_iter()
        .map(|glyphs| SourceTable::new(rows_from_glyphs(glyphs, options)))
        .collect();
    debug!(
        pages = tables.len(),
        rows = tables.iter().map(|t| t.rows.len()).sum::<usize>(),
        "parsed PDF layout"
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lays out `text` at `x` with a fixed advance of half the size.
    fn word(text: &str, x: f64, top: f64) -> Vec<Glyph> {
        let size = 10.0;
        text.chars()
            .enumerate()
            .filter(|(_, ch)| !ch.is_whitespace())
            .map(|(i, ch)| {
                let x0 = x + i as f64 * 5.0;
                Glyph::new(ch.to_string(), x0, x0 + 5.0, top, size)
            })
            .collect()
    }

    #[test]
    fn wide_gaps_split_cells_and_narrow_gaps_are_spaces() {
        let mut glyphs = word("Viscosidad de la", 20.0, 100.0);
        glyphs.extend(word("48.264", 200.0, 100.0));
        glyphs.extend(word("72.211", 300.0, 100.0));
        assert_eq!(
            rows_from_glyphs(glyphs, &PdfLayoutOptions::default()),
            vec![vec!["Viscosidad de la", "48.264", "72.211"]]
        );
    }

    #[test]
    fn lines_follow_baselines_not_emission_order() {
        let mut glyphs = word("Zinc", 20.0, 140.0);
        glyphs.extend(word("1.1", 200.0, 140.4));
        glyphs.extend(word("Boro", 20.0, 120.0));
        glyphs.reverse();
        let rows = rows_from_glyphs(glyphs, &PdfLayoutOptions::default());
        assert_eq!(rows, vec![vec!["Boro"], vec!["Zinc", "1.1"]]);
    }

    #[test]
    fn cell_gap_is_configurable() {
        let mut glyphs = word("Calcio", 20.0, 100.0);
        glyphs.extend(word("9.5", 65.0, 100.0));
        let wide = PdfLayoutOptions {
            cell_gap: 2.0,
            ..PdfLayoutOptions::default()
        };
        assert_eq!(rows_from_glyphs(glyphs.clone(), &wide), vec![vec!["Calcio 9.5"]]);
        assert_eq!(
            rows_from_glyphs(glyphs, &PdfLayoutOptions::default()),
            vec![vec!["Calcio", "9.5"]]
        );
    }

    #[test]
    fn garbage_bytes_are_unparseable() {
        let err = extract_pdf_tables(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, IngestError::Pdf(_)));
    }

    #[test]
    fn panic_payloads_are_described() {
        let payload = catch_unwind(|| panic!("deref")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "deref");
    }
}
