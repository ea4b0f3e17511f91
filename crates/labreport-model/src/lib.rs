#![deny(unsafe_code)]

pub mod error;
pub mod options;
pub mod parameter;
pub mod record;
pub mod source;

pub use error::{ModelError, Result};
pub use options::{DEFAULT_SIMILARITY_THRESHOLD, ExtractOptions, TieBreak};
pub use parameter::{CanonicalParameterSet, Parameter};
pub use record::{
    LABEL_HEADER, MatchedRecord, RawRecord, ResultTable, SourcePosition, VALUE_HEADER,
};
pub use source::{RowLayout, SourceTable};
