#![forbid(unsafe_code)]

pub mod store;
pub mod variable;

pub use store::*;
pub use variable::*;

use thiserror::Error;

/// Result type alias for variable operations
pub type Result<T> = std::result::Result<T, VariableError>;

/// Errors raised by variable stores and container variables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    #[error("variable `{0}` already exists")]
    DuplicateName(String),

    #[error("variable `{0}` not found")]
    NotFound(String),

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
