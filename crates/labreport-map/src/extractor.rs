//! Parameter extractor.
//!
//! Pure function of its input: the canonical set is borrowed, nothing is
//! cached between calls, and identical input yields an identical table.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use labreport_model::{
    CanonicalParameterSet, ExtractOptions, MatchedRecord, RawRecord, ResultTable, RowLayout,
    SourcePosition, SourceTable,
};

use crate::normalize::{normalize_label, normalize_value};
use crate::score::{Candidate, Resolution, best_match};

/// Row counters collected during one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Rows seen, including skipped ones.
    pub rows_scanned: usize,
    /// Rows with fewer cells than the layout needs.
    pub short_rows: usize,
    /// Labels that resolved to no canonical entry.
    pub unmatched: usize,
    /// Matched labels whose value was empty.
    pub empty_values: usize,
    /// Matched rows dropped because the label was already taken.
    pub duplicates: usize,
    /// Rows accepted into the table.
    pub matched: usize,
}

/// A label that did not make it into the table, kept for explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedLabel {
    /// Normalized label.
    pub label: String,
    pub position: SourcePosition,
    /// Closest canonical entry below the threshold, if any.
    pub closest: Option<Candidate>,
    /// Set when the label tied between several entries.
    pub tied: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionOutcome {
    pub table: ResultTable,
    pub stats: ExtractionStats,
    pub unmatched: Vec<UnmatchedLabel>,
}

/// Resolves observed labels against a canonical parameter set.
#[derive(Debug, Clone)]
pub struct ParameterExtractor<'a> {
    keys: Vec<String>,
    names: Vec<&'a str>,
    options: ExtractOptions,
    layout: RowLayout,
}

impl<'a> ParameterExtractor<'a> {
    pub fn new(parameters: &'a CanonicalParameterSet) -> Self {
        let names: Vec<&str> = parameters.names().collect();
        let keys = names.iter().map(|name| name.to_lowercase()).collect();
        Self {
            keys,
            names,
            options: ExtractOptions::default(),
            layout: RowLayout::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: RowLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Resolves a single observed label (normalized internally).
    pub fn resolve(&self, label: &str) -> Resolution {
        let normalized = normalize_label(label);
        best_match(
            &normalized,
            &self.keys,
            &self.names,
            self.options.threshold,
            self.options.tie_break,
        )
    }

    /// Reduces tables to raw records using the configured layout, skipping
    /// rows that are too short. Returns the records and the skipped count.
    pub fn raw_records(&self, tables: &[SourceTable]) -> (Vec<RawRecord>, usize) {
        let min_cells = self.layout.min_cells();
        let mut records = Vec::new();
        let mut short_rows = 0usize;
        for (table_idx, table) in tables.iter().enumerate() {
            for (row_idx, row) in table.rows.iter().enumerate() {
                if row.len() < min_cells {
                    short_rows += 1;
                    continue;
                }
                records.push(
                    RawRecord::new(
                        row[self.layout.label_column].clone(),
                        row[self.layout.value_column].clone(),
                    )
                    .at(table_idx, row_idx),
                );
            }
        }
        (records, short_rows)
    }

    /// Extracts from tables in document order.
    pub fn extract_tables(&self, tables: &[SourceTable]) -> ExtractionOutcome {
        let (records, short_rows) = self.raw_records(tables);
        let mut outcome = self.extract_records(records);
        outcome.stats.rows_scanned += short_rows;
        outcome.stats.short_rows = short_rows;
        outcome
    }

    /// Extracts from already-split records, in the order given.
    pub fn extract_records<I>(&self, records: I) -> ExtractionOutcome
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut outcome = ExtractionOutcome::default();
        for record in records {
            outcome.stats.rows_scanned += 1;
            let normalized = normalize_label(&record.label);
            let resolution = best_match(
                &normalized,
                &self.keys,
                &self.names,
                self.options.threshold,
                self.options.tie_break,
            );
            let candidate = match resolution {
                Resolution::Matched(candidate) => candidate,
                Resolution::BelowThreshold { best } => {
                    trace!(
                        label = %normalized,
                        closest = best.as_ref().map(|c| c.name.as_str()),
                        score = best.as_ref().map(|c| c.score),
                        "no canonical match"
                    );
                    outcome.stats.unmatched += 1;
                    outcome.unmatched.push(UnmatchedLabel {
                        label: normalized,
                        position: record.position,
                        closest: best,
                        tied: false,
                    });
                    continue;
                }
                Resolution::Tied { candidates } => {
                    debug!(
                        label = %normalized,
                        candidates = candidates.len(),
                        "ambiguous label rejected"
                    );
                    outcome.stats.unmatched += 1;
                    outcome.unmatched.push(UnmatchedLabel {
                        label: normalized,
                        position: record.position,
                        closest: candidates.into_iter().next(),
                        tied: true,
                    });
                    continue;
                }
            };
            let value = normalize_value(&record.value);
            if value.is_empty() {
                outcome.stats.empty_values += 1;
                continue;
            }
            let accepted = outcome.table.push_first(MatchedRecord {
                label: candidate.name,
                value: value.to_string(),
                score: candidate.score,
            });
            if accepted {
                outcome.stats.matched += 1;
            } else {
                outcome.stats.duplicates += 1;
            }
        }
        debug!(
            rows = outcome.stats.rows_scanned,
            matched = outcome.stats.matched,
            unmatched = outcome.stats.unmatched,
            duplicates = outcome.stats.duplicates,
            empty_values = outcome.stats.empty_values,
            "extraction complete"
        );
        outcome
    }
}
