//! Parameter extraction: turns source rows into a deduplicated result table
//! restricted to the canonical parameter set.

#![deny(unsafe_code)]

pub mod extractor;
pub mod normalize;
pub mod score;

pub use extractor::{ExtractionOutcome, ExtractionStats, ParameterExtractor, UnmatchedLabel};
pub use normalize::{normalize_label, normalize_value};
pub use score::{Candidate, Resolution, similarity};
