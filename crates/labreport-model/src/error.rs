use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("canonical parameter set is empty")]
    EmptyParameterSet,
    #[error("canonical parameter at position {position} has an empty name")]
    EmptyParameterName { position: usize },
    #[error("similarity threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
}

pub type Result<T> = std::result::Result<T, ModelError>;
