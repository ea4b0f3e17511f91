//! Interactive analysis session.
//!
//! The session owns the vocabulary and the result of the most recent
//! document. Each processed document replaces that result, matched or not.

use std::path::{Path, PathBuf};

use tracing::{info_span, trace, warn};

use labreport_ingest::{DocumentKind, ReadOptions, SourceDocument, parse_document, read_document};
use labreport_map::{ExtractionOutcome, ParameterExtractor};
use labreport_model::{CanonicalParameterSet, ExtractOptions, ResultTable};

use crate::logging::redact_value;

/// Result of processing one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub path: PathBuf,
    /// `None` when the format could not be determined or read.
    pub kind: Option<DocumentKind>,
    pub outcome: ExtractionOutcome,
    /// Reader error message for unparseable documents.
    pub failure: Option<String>,
}

impl DocumentReport {
    pub fn table(&self) -> &ResultTable {
        &self.outcome.table
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.table.is_empty()
    }

    pub fn is_unparseable(&self) -> bool {
        self.failure.is_some()
    }
}

pub struct AnalysisSession {
    parameters: CanonicalParameterSet,
    options: ExtractOptions,
    read_options: ReadOptions,
    last: Option<DocumentReport>,
}

impl AnalysisSession {
    pub fn new(parameters: CanonicalParameterSet) -> Self {
        Self {
            parameters,
            options: ExtractOptions::default(),
            read_options: ReadOptions::default(),
            last: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_read_options(mut self, read_options: ReadOptions) -> Self {
        self.read_options = read_options;
        self
    }

    pub fn parameters(&self) -> &CanonicalParameterSet {
        &self.parameters
    }

    /// The most recent report, or `None` before the first document.
    pub fn last_report(&self) -> Option<&DocumentReport> {
        self.last.as_ref()
    }

    pub fn last_result(&self) -> Option<&ResultTable> {
        self.last.as_ref().map(DocumentReport::table)
    }

    /// Reads `path` from disk and replaces the last result with its table.
    ///
    /// Read failures never escape: they produce an empty table and a warning.
    pub fn process(&mut self, path: &Path) -> &DocumentReport {
        let document = read_document(path, &self.read_options);
        self.record(path, document)
    }

    /// Same as [`Self::process`] for bytes already in memory.
    pub fn process_bytes(&mut self, path: &Path, bytes: &[u8]) -> &DocumentReport {
        let document = parse_document(path, bytes, &self.read_options);
        self.record(path, document)
    }

    fn record(
        &mut self,
        path: &Path,
        document: labreport_ingest::Result<SourceDocument>,
    ) -> &DocumentReport {
        let span = info_span!("document", path = %path.display());
        let _guard = span.enter();

        let report = match document {
            Ok(document) => {
                let outcome = ParameterExtractor::new(&self.parameters)
                    .with_options(self.options)
                    .extract_tables(&document.tables);
                for record in outcome.table.records() {
                    trace!(
                        label = %record.label,
                        value = redact_value(&record.value),
                        score = record.score,
                        "matched parameter"
                    );
                }
                if outcome.table.is_empty() {
                    warn!(
                        rows = outcome.stats.rows_scanned,
                        "no parameter matched in document"
                    );
                }
                DocumentReport {
                    path: path.to_path_buf(),
                    kind: Some(document.kind),
                    outcome,
                    failure: None,
                }
            }
            Err(error) => {
                warn!(%error, "document could not be read as a table");
                DocumentReport {
                    path: path.to_path_buf(),
                    kind: None,
                    outcome: ExtractionOutcome::default(),
                    failure: Some(error.to_string()),
                }
            }
        };
        self.last.insert(report)
    }
}
