#![forbid(unsafe_code)]

pub mod event;
pub mod instruction;
pub mod tree;

pub use event::*;
pub use instruction::*;
pub use tree::*;

use thiserror::Error;

/// Result type alias for event tree operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Errors raised by event trees and instruction lists
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("event index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{kind} events cannot hold {what}")]
    Unsupported { kind: EventKind, what: &'static str },

    /// Node addressing needs at least one index; only tree addressing
    /// accepts an empty path.
    #[error("an event path must contain at least one index")]
    EmptyPath,
}
