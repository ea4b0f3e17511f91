//! CSV and JSON exports.

use std::io::Write;

use csv::WriterBuilder;

use labreport_model::{LABEL_HEADER, ResultTable, VALUE_HEADER};

use crate::common::report_rows;
use crate::error::{ReportError, Result};

/// Writes `#,Objeto Analizado,Valor Obtenido` followed by one line per record.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(["#", LABEL_HEADER, VALUE_HEADER])?;
    for row in report_rows(table) {
        writer.write_record([row.index.to_string().as_str(), row.label, row.value])?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn to_csv_string(table: &ResultTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn to_json_string(table: &ResultTable) -> Result<String> {
    serde_json::to_string_pretty(&report_rows(table)).map_err(ReportError::from)
}
