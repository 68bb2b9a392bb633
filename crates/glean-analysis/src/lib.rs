//! # glean-analysis
//!
//! The analysis orchestrator: validates a submission, claims the article's
//! record with an atomic guard, runs the LLM call on a bounded pool, and
//! answers result and status queries from the stored record.
//!
//! ```text
//! submit ──► get_article ──► status read ──► reserve slot ──► begin_processing ──► spawn
//!                                                                                   │
//!             execute: touch own attempt ─► analyze ─► complete | failed
//! ```

pub mod dispatcher;
pub mod error;
pub mod orchestrator;
pub mod store;

pub use error::AnalysisError;
pub use orchestrator::{
    AnalysisOrchestrator, INTERRUPTED_MESSAGE, OrchestratorOptions, SAVE_FAILED_PREFIX,
};
pub use store::{AnalysisStore, ArticleSource};
