#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod paths;

pub use crate::error::StandardsError;
pub use crate::loader::{
    builtin_parameter_set, load_default_parameter_set, load_parameter_set, parse_parameter_set,
    resolve_parameter_set,
};
pub use crate::paths::{STANDARDS_ENV_VAR, parameters_path, standards_root};
