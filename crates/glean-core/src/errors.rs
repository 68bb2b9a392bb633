//! Cross-cutting error types for glean.
//!
//! Domain-specific errors (`DatabaseError`, `LlmError`, `AnalysisError`) are
//! defined in their respective crates. The binary converges them with `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any glean crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A task identifier did not match `task_{article_id}_{unix_seconds}`.
    #[error("Invalid task id: {0}")]
    InvalidTaskId(String),

    /// A stored or supplied status string is outside the closed status set.
    #[error("Unknown analysis status: {0}")]
    UnknownStatus(String),

    /// Input failed validation (file type, size, encoding).
    #[error("Validation error: {0}")]
    Validation(String),
}
