use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use labreport_ingest::ReadOptions;
use labreport_model::{CanonicalParameterSet, ExtractOptions, ResultTable};
use labreport_report::{to_csv_string, to_json_string, write_pdf};
use labreport_standards::resolve_parameter_set;

use labreport_cli::session::{AnalysisSession, DocumentReport};

use crate::cli::{ExtractArgs, OutputFormatArg, ParametersArgs};
use crate::summary::{parameters_table, print_report};

/// Counts from one `extract` invocation.
#[derive(Debug, Default)]
pub struct ExtractRun {
    pub documents: usize,
    pub empty: usize,
    pub pdf: Option<PathBuf>,
}

impl ExtractRun {
    pub fn all_matched(&self) -> bool {
        self.documents > 0 && self.empty == 0
    }
}

fn load_vocabulary(explicit: Option<&Path>) -> Result<CanonicalParameterSet> {
    let parameters = resolve_parameter_set(explicit).context("load parameter vocabulary")?;
    info!(parameters = parameters.len(), "vocabulary loaded");
    Ok(parameters)
}

pub fn run_parameters(args: &ParametersArgs) -> Result<()> {
    let parameters = load_vocabulary(args.vocabulary.vocabulary.as_deref())?;
    println!("{}", parameters_table(&parameters));
    Ok(())
}

pub fn run_extract(args: &ExtractArgs) -> Result<ExtractRun> {
    let parameters = load_vocabulary(args.vocabulary.vocabulary.as_deref())?;
    let options = ExtractOptions::new()
        .with_threshold(args.threshold)
        .context("invalid --threshold")?
        .with_tie_break(args.tie_break.into());
    let read_options = ReadOptions {
        encoding: args.encoding.into(),
    };
    let mut session = AnalysisSession::new(parameters)
        .with_options(options)
        .with_read_options(read_options);

    let mut run = ExtractRun::default();
    let mut printable: Option<ResultTable> = None;
    for path in &args.documents {
        let report = session.process(path);
        run.documents += 1;
        if report.is_empty() {
            run.empty += 1;
        } else {
            printable = Some(report.table().clone());
        }
        emit(report, args)?;
    }

    if let Some(pdf_path) = &args.pdf_out {
        let span = info_span!("pdf", path = %pdf_path.display());
        let _guard = span.enter();
        match &printable {
            Some(table) => {
                write_pdf(table, pdf_path)
                    .with_context(|| format!("write PDF report {}", pdf_path.display()))?;
                run.pdf = Some(pdf_path.clone());
            }
            None => {
                warn!("no non-empty result to print");
                eprintln!("warning: no parameters extracted; PDF report not written");
            }
        }
    }
    Ok(run)
}

fn emit(report: &DocumentReport, args: &ExtractArgs) -> Result<()> {
    match args.format {
        OutputFormatArg::Table => print_report(report, args.show_discarded),
        OutputFormatArg::Csv => {
            warn_if_empty(report);
            print!("{}", to_csv_string(report.table()).context("export CSV")?);
        }
        OutputFormatArg::Json => {
            warn_if_empty(report);
            println!("{}", to_json_string(report.table()).context("export JSON")?);
        }
    }
    Ok(())
}

fn warn_if_empty(report: &DocumentReport) {
    if let Some(failure) = &report.failure {
        eprintln!("warning: {} could not be read: {failure}", report.path.display());
    } else if report.is_empty() {
        eprintln!("warning: no parameter matched in {}", report.path.display());
    }
}
