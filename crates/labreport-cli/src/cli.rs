//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use labreport_ingest::TextEncoding;
use labreport_model::{DEFAULT_SIMILARITY_THRESHOLD, TieBreak};

#[derive(Parser)]
#[command(
    name = "labreport",
    version,
    about = "Extract clinical parameters from lab-instrument reports",
    long_about = "Extract clinical parameters from lab-instrument reports.\n\n\
                  Reads HTML or PDF exports, fuzzy-matches row labels against a closed\n\
                  vocabulary of parameter names, and prints or exports the result table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include observed patient values in trace-level log events.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract parameters from one or more report documents.
    Extract(ExtractArgs),

    /// List the recognized parameter vocabulary.
    Parameters(ParametersArgs),
}

#[derive(Args)]
pub struct VocabularyArgs {
    /// Parameter vocabulary CSV (default: standards directory, then built-in list).
    #[arg(long = "vocabulary", value_name = "PATH")]
    pub vocabulary: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// HTML or PDF report files, processed in order.
    #[arg(value_name = "DOCUMENT", required = true)]
    pub documents: Vec<PathBuf>,

    #[command(flatten)]
    pub vocabulary: VocabularyArgs,

    /// Minimum label similarity, in (0, 1].
    #[arg(long = "threshold", value_name = "F", default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    pub threshold: f64,

    /// Resolution of labels that score equally against several parameters.
    #[arg(long = "tie-break", value_enum, default_value = "first")]
    pub tie_break: TieBreakArg,

    /// Character encoding of HTML reports.
    #[arg(long = "encoding", value_enum, default_value = "latin1")]
    pub encoding: EncodingArg,

    /// How each result table is printed.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Write the last non-empty result as a printable PDF report.
    #[arg(long = "pdf-out", value_name = "PATH")]
    pub pdf_out: Option<PathBuf>,

    /// Also list rows whose label matched no parameter.
    #[arg(long = "show-discarded")]
    pub show_discarded: bool,
}

#[derive(Args)]
pub struct ParametersArgs {
    #[command(flatten)]
    pub vocabulary: VocabularyArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TieBreakArg {
    /// Parameter declared first wins.
    First,
    /// Ties are not matched.
    Reject,
}

impl From<TieBreakArg> for TieBreak {
    fn from(value: TieBreakArg) -> Self {
        match value {
            TieBreakArg::First => TieBreak::FirstDeclared,
            TieBreakArg::Reject => TieBreak::Reject,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EncodingArg {
    Latin1,
    Utf8,
    Auto,
}

impl From<EncodingArg> for TextEncoding {
    fn from(value: EncodingArg) -> Self {
        match value {
            EncodingArg::Latin1 => TextEncoding::Latin1,
            EncodingArg::Utf8 => TextEncoding::Utf8,
            EncodingArg::Auto => TextEncoding::Auto,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
