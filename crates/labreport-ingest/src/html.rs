//! HTML table reader.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use labreport_model::SourceTable;

use crate::error::{IngestError, Result};

fn selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| IngestError::Selector {
        selector: raw.to_string(),
        message: e.to_string(),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

/// Every `<table>` in document order, with the first `<tr>` of each dropped
/// as its header. Each remaining row yields the full text of its `<td>`
/// cells; `<th>` cells are not data.
///
/// # Errors
///
/// Returns [`IngestError::NoTables`] when the document has no table at all.
pub fn extract_tables(html: &str) -> Result<Vec<SourceTable>> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let mut tables = Vec::new();
    for table in document.select(&table_selector) {
        let rows: Vec<Vec<String>> = table
            .select(&row_selector)
            .skip(1)
            .map(|row| row.select(&cell_selector).map(cell_text).collect())
            .collect();
        tables.push(SourceTable::new(rows));
    }
    if tables.is_empty() {
        return Err(IngestError::NoTables);
    }
    debug!(
        tables = tables.len(),
        rows = tables.iter().map(|t| t.rows.len()).sum::<usize>(),
        "parsed HTML tables"
    );
    Ok(tables)
}
