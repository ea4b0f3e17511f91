use serde::Serialize;

use labreport_model::ResultTable;

/// Flat export shape of one result-table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow<'a> {
    pub index: usize,
    pub label: &'a str,
    pub value: &'a str,
}

pub fn report_rows(table: &ResultTable) -> Vec<ReportRow<'_>> {
    table
        .indexed()
        .map(|(index, record)| ReportRow {
            index,
            label: &record.label,
            value: &record.value,
        })
        .collect()
}
