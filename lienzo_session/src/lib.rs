#![forbid(unsafe_code)]

pub mod registry;
pub mod session;

pub use registry::*;
pub use session::*;

use std::path::PathBuf;

use thiserror::Error;

use lienzo_project::DocumentError;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by sessions and the registry
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session `{0}` already exists")]
    SessionConflict(String),

    #[error("session `{0}` not found")]
    SessionNotFound(String),

    #[error("nothing to back up: no file on disk at `{0}`")]
    NothingToBackUp(PathBuf),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serde(#[from] serde_json::Error),
}
