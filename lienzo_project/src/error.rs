use thiserror::Error;

use lienzo_events::EventError;
use lienzo_variant::VariableError;

/// Result type alias for document mutations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors raised by the document model. Every variant carries the
/// offending name or index so the calling layer can report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("{kind} `{name}` already exists")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{kind} `{name}` not found")]
    NotFound { kind: &'static str, name: String },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Instance creation naming an object that exists neither in the
    /// scene's container nor in the global container.
    #[error("object `{0}` not found in scene or global containers")]
    ObjectNotFound(String),

    #[error(transparent)]
    Variable(#[from] VariableError),

    #[error(transparent)]
    Event(#[from] EventError),
}

impl DocumentError {
    #[inline]
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        DocumentError::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    #[inline]
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        DocumentError::NotFound {
            kind,
            name: name.into(),
        }
    }
}
