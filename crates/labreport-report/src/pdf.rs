//! Printable A4 report.
//!
//! The layout is a centred title followed by a two-column bordered grid
//! (`Objeto Analizado`, `Valor Obtenido`). Rows that do not fit on a page
//! continue on the next one under a repeated header row.

use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use tracing::{debug, info};

use labreport_model::{LABEL_HEADER, ResultTable, VALUE_HEADER};

use crate::error::{ReportError, Result};

pub const REPORT_TITLE: &str = "Informe de Parámetros Médicos del Paciente";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 20.0;
const TITLE_HEIGHT: f32 = 10.0;
const COLUMN_WIDTH: f32 = 90.0;
const ROW_HEIGHT: f32 = 10.0;
const CELL_PADDING: f32 = 2.0;
const TITLE_SIZE: f32 = 12.0;
const CELL_SIZE: f32 = 10.0;
const MIN_CELL_SIZE: f32 = 6.0;
const LINE_THICKNESS: f32 = 0.2;

/// Average Helvetica glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;
const PT_TO_MM: f32 = 0.352_778;

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_ADVANCE * PT_TO_MM
}

/// Largest font size up to [`CELL_SIZE`] that keeps `text` inside a cell.
fn fitted_size(text: &str) -> f32 {
    let available = COLUMN_WIDTH - 2.0 * CELL_PADDING;
    let natural = text_width(text, CELL_SIZE);
    if natural <= available {
        CELL_SIZE
    } else {
        (CELL_SIZE * available / natural).max(MIN_CELL_SIZE)
    }
}

fn rows_per_page() -> usize {
    let first_row_top = PAGE_HEIGHT - MARGIN - TITLE_HEIGHT;
    // One slot per page goes to the header row.
    (((first_row_top - BOTTOM_MARGIN) / ROW_HEIGHT).floor() as usize).saturating_sub(1).max(1)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
        Ok(Self { regular, bold })
    }
}

fn cell_border(layer: &PdfLayerReference, left: f32, top: f32) {
    let corners = [
        (left, top),
        (left + COLUMN_WIDTH, top),
        (left + COLUMN_WIDTH, top - ROW_HEIGHT),
        (left, top - ROW_HEIGHT),
    ];
    let line = Line {
        points: corners
            .iter()
            .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
            .collect(),
        is_closed: true,
    };
    layer.add_line(line);
}

fn table_row(layer: &PdfLayerReference, top: f32, cells: [&str; 2], font: &IndirectFontRef) {
    for (column, text) in cells.into_iter().enumerate() {
        let left = MARGIN + column as f32 * COLUMN_WIDTH;
        cell_border(layer, left, top);
        layer.use_text(
            text,
            fitted_size(text),
            Mm(left + CELL_PADDING),
            Mm(top - ROW_HEIGHT + 3.5),
            font,
        );
    }
}

fn page_heading(layer: &PdfLayerReference, title: &str, fonts: &Fonts) -> f32 {
    layer.set_outline_thickness(LINE_THICKNESS);
    let title_x = ((PAGE_WIDTH - text_width(title, TITLE_SIZE)) / 2.0).max(MARGIN);
    let title_top = PAGE_HEIGHT - MARGIN;
    layer.use_text(
        title,
        TITLE_SIZE,
        Mm(title_x),
        Mm(title_top - TITLE_HEIGHT + 3.0),
        &fonts.bold,
    );
    let header_top = title_top - TITLE_HEIGHT;
    table_row(layer, header_top, [LABEL_HEADER, VALUE_HEADER], &fonts.bold);
    header_top - ROW_HEIGHT
}

/// Renders the report with the standard title.
pub fn render_pdf(table: &ResultTable) -> Result<Vec<u8>> {
    render_pdf_with_title(table, REPORT_TITLE)
}

pub fn render_pdf_with_title(table: &ResultTable, title: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts::load(&doc)?;

    let per_page = rows_per_page();
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut top = page_heading(&layer, title, &fonts);
    let mut pages = 1usize;

    for (position, record) in table.records().iter().enumerate() {
        if position > 0 && position % per_page == 0 {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            top = page_heading(&layer, title, &fonts);
            pages += 1;
        }
        table_row(&layer, top, [&record.label, &record.value], &fonts.regular);
        top -= ROW_HEIGHT;
    }
    debug!(rows = table.len(), pages, "rendered PDF report");

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

/// Renders the report and writes it to `path`.
pub fn write_pdf(table: &ResultTable, path: &Path) -> Result<()> {
    let bytes = render_pdf(table)?;
    std::fs::write(path, &bytes).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = table.len(), "wrote PDF report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_holds_a_full_vocabulary_worth_of_rows_over_three_pages() {
        let per_page = rows_per_page();
        assert_eq!(per_page, 24);
        assert_eq!(69usize.div_ceil(per_page), 3);
    }

    #[test]
    fn long_labels_shrink_to_fit() {
        let long = "Coeficiente de la Función de Peristalsis del Intestino Grueso (colon)";
        let size = fitted_size(long);
        assert!(size < CELL_SIZE);
        assert!(size >= MIN_CELL_SIZE);
        assert_eq!(fitted_size("Hierro"), CELL_SIZE);
    }
}
