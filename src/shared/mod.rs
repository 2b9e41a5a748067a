/// Shared kernel - error types, result alias, logging and file-safety helpers
pub mod error;
pub mod logging;
pub mod result;
pub mod security;

pub use error::{AppError, ExitCode, GraphError};
pub use result::Result;
