//! Submission, background execution, and queries for article analyses.
//!
//! The analysis record's status is the only shared state. Submission claims
//! it with one conditional write, then hands the LLM call to the
//! [`Dispatcher`]. Each claim carries an attempt number, and executions write
//! their outcome only while their own attempt still holds the claim.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use glean_config::{AnalysisConfig, LlmConfig};
use glean_core::entities::{AnalysisRecord, AnalysisTask};
use glean_core::enums::AnalysisStatus;
use glean_core::ids::{format_task_id, parse_task_id};
use glean_core::responses::StatusReport;
use glean_llm::ArticleAnalyzer;

use crate::dispatcher::Dispatcher;
use crate::error::AnalysisError;
use crate::store::{AnalysisStore, ArticleSource};

/// Error stored on records failed by [`AnalysisOrchestrator::reconcile_stale`].
pub const INTERRUPTED_MESSAGE: &str = "analysis interrupted before completion";

/// Prefix of the error stored when the analyzer succeeded but the result
/// could not be written.
pub const SAVE_FAILED_PREFIX: &str = "failed to save analysis result";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub max_concurrent: usize,
    pub queue_capacity: usize,
    /// Upper bound on one analyzer call.
    pub timeout: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default(), &LlmConfig::default())
    }
}

impl OrchestratorOptions {
    #[must_use]
    pub const fn from_config(analysis: &AnalysisConfig, llm: &LlmConfig) -> Self {
        Self {
            max_concurrent: analysis.max_concurrent,
            queue_capacity: analysis.queue_capacity,
            timeout: Duration::from_secs(llm.timeout_secs),
        }
    }
}

struct Inner<S, A> {
    store: S,
    analyzer: A,
    timeout: Duration,
}

pub struct AnalysisOrchestrator<S, A> {
    inner: Arc<Inner<S, A>>,
    dispatcher: Dispatcher,
}

impl<S, A> AnalysisOrchestrator<S, A>
where
    S: ArticleSource + AnalysisStore + 'static,
    A: ArticleAnalyzer + 'static,
{
    pub fn new(store: S, analyzer: A, options: OrchestratorOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                analyzer,
                timeout: options.timeout,
            }),
            dispatcher: Dispatcher::new(options.max_concurrent, options.queue_capacity),
        }
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Claim `article_id` for analysis and start the execution in the background.
    ///
    /// Returns once the record is `processing`; the LLM call has not
    /// necessarily started.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a non-positive id.
    /// - `NotFound` if the article does not exist.
    /// - `Conflict` if an execution for this article is already running.
    /// - `Overloaded` if the pool is full.
    ///
    /// None of these change any state.
    pub async fn submit(&self, article_id: i64) -> Result<AnalysisTask, AnalysisError> {
        if article_id <= 0 {
            return Err(AnalysisError::InvalidArgument(format!(
                "article id must be positive, got {article_id}"
            )));
        }

        let article = self
            .inner
            .store
            .get_article(article_id)
            .await?
            .ok_or(AnalysisError::NotFound {
                entity: "article",
                id: article_id,
            })?;

        if let Some(record) = self.inner.store.get_by_article(article_id).await? {
            if record.status == AnalysisStatus::Processing {
                tracing::info!(article_id, "analysis already running");
                return Err(AnalysisError::Conflict { article_id });
            }
        }

        let slot = self.dispatcher.reserve().ok_or(AnalysisError::Overloaded {
            capacity: self.dispatcher.capacity(),
        })?;

        // The read above is advisory; the claim is what admits one execution.
        let Some(attempt) = self.inner.store.begin_processing(article_id).await? else {
            tracing::info!(article_id, "analysis already running");
            return Err(AnalysisError::Conflict { article_id });
        };

        let task_id = format_task_id(article_id, Utc::now());
        tracing::info!(article_id, attempt, task_id = %task_id, "analysis submitted");

        let inner = Arc::clone(&self.inner);
        let content = article.content;
        let background_task_id = task_id.clone();
        self.dispatcher.spawn(slot, async move {
            inner
                .execute(article_id, attempt, &background_task_id, &content)
                .await;
        });

        Ok(AnalysisTask {
            task_id,
            article_id,
            status: AnalysisStatus::Processing,
        })
    }

    /// The stored record for `article_id`, as-is.
    ///
    /// # Errors
    ///
    /// `NotFound` if no analysis was ever submitted for the article.
    pub async fn get_result(&self, article_id: i64) -> Result<AnalysisRecord, AnalysisError> {
        self.inner
            .store
            .get_by_article(article_id)
            .await?
            .ok_or(AnalysisError::NotFound {
                entity: "analysis for article",
                id: article_id,
            })
    }

    /// Status of the record behind `task_id`. Unknown tasks report `pending`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `task_id` is malformed.
    pub async fn get_status(&self, task_id: &str) -> Result<StatusReport, AnalysisError> {
        let article_id = parse_task_id(task_id)?;
        let report = match self.inner.store.get_by_article(article_id).await? {
            Some(record) => StatusReport::from_record(task_id, &record),
            None => StatusReport::unknown(task_id),
        };
        Ok(report)
    }

    /// Mark records stuck in `processing` for longer than `grace` as `failed`.
    ///
    /// Returns how many records were failed. Nothing is resumed.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn reconcile_stale(&self, grace: Duration) -> Result<u64, AnalysisError> {
        let grace = chrono::Duration::from_std(grace).map_err(|e| {
            AnalysisError::InvalidArgument(format!("grace period out of range: {e}"))
        })?;
        let cutoff = Utc::now() - grace;
        let failed = self
            .inner
            .store
            .fail_stale(cutoff, INTERRUPTED_MESSAGE)
            .await?;
        if failed > 0 {
            tracing::warn!(failed, cutoff = %cutoff, "failed stale analyses");
        }
        Ok(failed)
    }

    /// Wait for every submitted execution to finish.
    pub async fn wait_idle(&self) {
        self.dispatcher.wait_idle().await;
    }
}

impl<S, A> Inner<S, A>
where
    S: AnalysisStore,
    A: ArticleAnalyzer,
{
    async fn execute(&self, article_id: i64, attempt: i64, task_id: &str, content: &str) {
        tracing::info!(article_id, attempt, task_id, "analysis started");

        match self.store.touch_processing(article_id, attempt).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(article_id, attempt, task_id, "claim superseded, abandoning");
                return;
            }
            Err(e) => {
                tracing::error!(article_id, task_id, error = %e, "could not re-assert processing");
                return;
            }
        }

        match self.analyzer.analyze_article(content, self.timeout).await {
            Ok(facets) => match self.store.complete(article_id, attempt, &facets).await {
                Ok(true) => tracing::info!(article_id, task_id, "analysis completed"),
                Ok(false) => {
                    tracing::warn!(article_id, task_id, "no processing record left to complete");
                }
                Err(e) => {
                    tracing::error!(article_id, task_id, error = %e, "could not store analysis");
                    let message = format!("{SAVE_FAILED_PREFIX}: {e}");
                    self.record_failure(article_id, attempt, task_id, &message).await;
                }
            },
            Err(e) => {
                let message = AnalysisError::from(e).to_string();
                self.record_failure(article_id, attempt, task_id, &message).await;
            }
        }
    }

    async fn record_failure(&self, article_id: i64, attempt: i64, task_id: &str, message: &str) {
        match self.store.fail(article_id, attempt, message).await {
            Ok(true) => {
                tracing::warn!(article_id, task_id, error = %message, "analysis failed");
            }
            Ok(false) => {
                tracing::warn!(
                    article_id,
                    task_id,
                    error = %message,
                    "analysis failed but no processing record left to update"
                );
            }
            Err(e) => {
                tracing::error!(article_id, task_id, error = %e, "could not record failure");
            }
        }
    }
}
