//! Orchestrator error taxonomy.

use glean_core::errors::CoreError;
use glean_db::error::DatabaseError;
use glean_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("analysis for article {article_id} is already running")]
    Conflict { article_id: i64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Every worker is busy and the wait queue is full.
    #[error("analysis queue is full ({capacity} executions running or waiting)")]
    Overloaded { capacity: usize },

    #[error("AI analysis failed: {0}")]
    Upstream(String),

    #[error("failed to parse analysis result: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<CoreError> for AnalysisError {
    fn from(err: CoreError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        if err.is_malformed() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn upstream_message() {
        let err = AnalysisError::from(LlmError::Timeout(Duration::from_secs(120)));
        assert_eq!(err.to_string(), "AI analysis failed: request timed out after 120s");
    }

    #[test]
    fn malformed_message() {
        let err = AnalysisError::from(LlmError::MalformedResponse(
            "no JSON object found in reply".into(),
        ));
        assert_eq!(
            err.to_string(),
            "failed to parse analysis result: no JSON object found in reply"
        );
    }

    #[test]
    fn bad_task_id_is_invalid_argument() {
        let err = AnalysisError::from(CoreError::InvalidTaskId("nope".into()));
        assert!(matches!(err, AnalysisError::InvalidArgument(_)));
    }
}
