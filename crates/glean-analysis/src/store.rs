//! Storage seams the orchestrator depends on, implemented for `GleanService`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glean_core::entities::{AnalysisFacets, AnalysisRecord, Article};
use glean_db::error::DatabaseError;
use glean_db::service::GleanService;

/// Read access to articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn get_article(&self, article_id: i64) -> Result<Option<Article>, DatabaseError>;
}

/// Per-article analysis records with conditional status writes.
///
/// Each claim gets an attempt number. Writes that carry an attempt apply only
/// while that attempt still holds the `processing` claim.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn get_by_article(&self, article_id: i64)
    -> Result<Option<AnalysisRecord>, DatabaseError>;

    /// Atomically claim the article for a new execution.
    ///
    /// Returns the claim's attempt, or `None` if an execution already holds it.
    async fn begin_processing(&self, article_id: i64) -> Result<Option<i64>, DatabaseError>;

    async fn touch_processing(&self, article_id: i64, attempt: i64)
    -> Result<bool, DatabaseError>;

    async fn complete(
        &self,
        article_id: i64,
        attempt: i64,
        facets: &AnalysisFacets,
    ) -> Result<bool, DatabaseError>;

    async fn fail(&self, article_id: i64, attempt: i64, message: &str)
    -> Result<bool, DatabaseError>;

    async fn fail_stale(&self, cutoff: DateTime<Utc>, message: &str)
    -> Result<u64, DatabaseError>;
}

#[async_trait]
impl ArticleSource for GleanService {
    async fn get_article(&self, article_id: i64) -> Result<Option<Article>, DatabaseError> {
        Self::get_article(self, article_id).await
    }
}

#[async_trait]
impl AnalysisStore for GleanService {
    async fn get_by_article(
        &self,
        article_id: i64,
    ) -> Result<Option<AnalysisRecord>, DatabaseError> {
        self.get_analysis_by_article(article_id).await
    }

    async fn begin_processing(&self, article_id: i64) -> Result<Option<i64>, DatabaseError> {
        self.begin_analysis_processing(article_id).await
    }

    async fn touch_processing(
        &self,
        article_id: i64,
        attempt: i64,
    ) -> Result<bool, DatabaseError> {
        self.touch_analysis_processing(article_id, attempt).await
    }

    async fn complete(
        &self,
        article_id: i64,
        attempt: i64,
        facets: &AnalysisFacets,
    ) -> Result<bool, DatabaseError> {
        self.complete_analysis(article_id, attempt, facets).await
    }

    async fn fail(
        &self,
        article_id: i64,
        attempt: i64,
        message: &str,
    ) -> Result<bool, DatabaseError> {
        self.fail_analysis(article_id, attempt, message).await
    }

    async fn fail_stale(
        &self,
        cutoff: DateTime<Utc>,
        message: &str,
    ) -> Result<u64, DatabaseError> {
        self.fail_stale_processing(cutoff, message).await
    }
}
