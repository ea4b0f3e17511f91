//! Records flowing through extraction and the result table they produce.

use serde::{Deserialize, Serialize};

/// Column heading for canonical parameter names in displays and exports.
pub const LABEL_HEADER: &str = "Objeto Analizado";
/// Column heading for measured values in displays and exports.
pub const VALUE_HEADER: &str = "Valor Obtenido";

/// Where a raw record came from in the source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Zero-based table (or PDF page) index in document order.
    pub table: usize,
    /// Zero-based row index within the table, header excluded.
    pub row: usize,
}

/// One source row reduced to its label and value cells, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub label: String,
    pub value: String,
    pub position: SourcePosition,
}

impl RawRecord {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            position: SourcePosition::default(),
        }
    }

    #[must_use]
    pub fn at(mut self, table: usize, row: usize) -> Self {
        self.position = SourcePosition { table, row };
        self
    }
}

/// A validated pair: canonical label plus the observed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRecord {
    /// Canonical spelling from the parameter set.
    pub label: String,
    /// Observed value, trimmed, never empty.
    pub value: String,
    /// Similarity between the observed label and `label`.
    pub score: f64,
}

/// Ordered matched records, unique by label, first occurrence wins.
///
/// Only built through [`ResultTable::push_first`], so it serializes but does
/// not deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    records: Vec<MatchedRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record unless its label is already present.
    ///
    /// Returns `false` when the record was dropped as a duplicate.
    pub fn push_first(&mut self, record: MatchedRecord) -> bool {
        if self.contains(&record.label) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MatchedRecord] {
        &self.records
    }

    pub fn contains(&self, label: &str) -> bool {
        self.records.iter().any(|r| r.label == label)
    }

    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }

    /// Records paired with their 1-based display index.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &MatchedRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    /// `(index, label, value)` triples, the table's externally visible shape.
    pub fn rows(&self) -> Vec<(usize, &str, &str)> {
        self.indexed()
            .map(|(i, r)| (i, r.label.as_str(), r.value.as_str()))
            .collect()
    }
}
