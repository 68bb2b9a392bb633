//! LLM client error types.

use std::time::Duration;

use thiserror::Error;

/// Errors from one analysis call.
///
/// Transport, HTTP status, timeout and empty-choice failures are upstream
/// errors. Everything that goes wrong after a reply arrived is malformed.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("provider returned no choices")]
    EmptyChoices,

    #[error("{0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Whether the provider answered but the answer could not be decoded.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}
