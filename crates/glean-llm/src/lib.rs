//! # glean-llm
//!
//! Turns article text into the four-facet analysis through one
//! chat-completion call.
//!
//! - [`prompt`] builds the deterministic analysis prompt.
//! - [`client::LlmClient`] sends it to an OpenAI-compatible endpoint.
//! - [`extract`] pulls the JSON object out of the free-form reply.
//!
//! The orchestrator depends only on [`ArticleAnalyzer`].

pub mod client;
pub mod error;
pub mod extract;
pub mod prompt;

use std::time::Duration;

use async_trait::async_trait;
use glean_core::entities::AnalysisFacets;

pub use client::LlmClient;
pub use error::LlmError;

/// Produces an analysis for a piece of article text.
#[async_trait]
pub trait ArticleAnalyzer: Send + Sync {
    /// Analyze `content`, giving up after `timeout`.
    async fn analyze_article(
        &self,
        content: &str,
        timeout: Duration,
    ) -> Result<AnalysisFacets, LlmError>;
}
