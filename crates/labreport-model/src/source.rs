//! Tabular content handed over by the document readers.

use serde::{Deserialize, Serialize};

/// One table (or one PDF page) as rows of trimmed-or-raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

/// Which cells of a row hold the label and the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    pub label_column: usize,
    pub value_column: usize,
}

impl RowLayout {
    /// Lab-instrument exports: label in the first cell, value in the third.
    pub const LAB_EXPORT: Self = Self {
        label_column: 0,
        value_column: 2,
    };

    /// Rows shorter than this are skipped.
    pub fn min_cells(&self) -> usize {
        self.label_column.max(self.value_column) + 1
    }
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::LAB_EXPORT
    }
}
