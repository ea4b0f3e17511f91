//! Configuration options for parameter extraction.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Minimum similarity for a label to resolve to a canonical parameter.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// How equally-best candidates are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Pick the candidate declared first in the parameter set.
    #[default]
    FirstDeclared,
    /// Treat a tie as no match.
    Reject,
}

/// Options controlling label matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionFields")]
pub struct ExtractOptions {
    /// Similarity a candidate must reach to be accepted, in `(0, 1]`.
    pub threshold: f64,
    /// Resolution for equally-scored best candidates.
    pub tie_break: TieBreak,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            tie_break: TieBreak::default(),
        }
    }
}

/// Unchecked wire shape, validated into [`ExtractOptions`].
#[derive(Deserialize)]
struct OptionFields {
    #[serde(default = "default_threshold")]
    threshold: f64,
    #[serde(default)]
    tie_break: TieBreak,
}

fn default_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl TryFrom<OptionFields> for ExtractOptions {
    type Error = ModelError;

    fn try_from(fields: OptionFields) -> Result<Self> {
        Ok(Self::new()
            .with_threshold(fields.threshold)?
            .with_tie_break(fields.tie_break))
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the threshold after checking it lies in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidThreshold`] for out-of-range or NaN values.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ModelError::InvalidThreshold(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }

    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}
