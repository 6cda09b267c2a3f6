//! Error types for the session engine.

use thiserror::Error;

/// Errors that can occur at the fallible edges of a session.
///
/// Ordinary editing operations are total and never produce these; unknown
/// ids there are no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Document already open: {0}")]
    DuplicateDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
