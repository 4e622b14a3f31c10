//! Errors raised by editor adapters.

use thiserror::Error;

/// Failure reported by an [`EditorAdapter`](crate::editor::EditorAdapter).
///
/// Both kinds are local to a single adapter call. The sync layer catches them
/// at the call site and never hands them back as a `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Editor content could not be read.
    #[error("failed to read editor content: {0}")]
    Read(String),
    /// Editor content could not be written.
    #[error("failed to write editor content: {0}")]
    Write(String),
}

impl EditorError {
    pub fn read(reason: impl Into<String>) -> Self {
        Self::Read(reason.into())
    }

    pub fn write(reason: impl Into<String>) -> Self {
        Self::Write(reason.into())
    }
}
