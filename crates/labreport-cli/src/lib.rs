//! Library side of the `labreport` binary: logging setup and session state.

pub mod logging;
pub mod session;
