//! Analysis repository: one record per article, conditional status writes.
//!
//! Every status change is a single conditional statement. The affected-row
//! count tells the caller whether the write applied, so no transition depends
//! on a prior read.

use chrono::{DateTime, Utc};

use glean_core::entities::{AnalysisFacets, AnalysisRecord};
use glean_core::enums::AnalysisStatus;

use crate::error::DatabaseError;
use crate::helpers::{
    format_timestamp, get_nullable_string, get_opt_string, parse_datetime,
    parse_optional_datetime, parse_status,
};
use crate::service::GleanService;

const SELECT_COLS: &str = "id, article_id, core_viewpoints, file_structure, author_thoughts, \
     related_materials, analysis_status, analysis_time, error_message, created_at, updated_at";

fn row_to_record(row: &libsql::Row) -> Result<AnalysisRecord, DatabaseError> {
    Ok(AnalysisRecord {
        id: row.get(0)?,
        article_id: row.get(1)?,
        core_viewpoints: get_nullable_string(row, 2)?,
        file_structure: get_nullable_string(row, 3)?,
        author_thoughts: get_nullable_string(row, 4)?,
        related_materials: get_nullable_string(row, 5)?,
        status: parse_status(&row.get::<String>(6)?)?,
        analysis_time: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        error_message: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

/// SQL list of the quoted states `next` may be entered from.
fn previous_states_sql(next: AnalysisStatus) -> Option<String> {
    let states = AnalysisStatus::allowed_previous_states(next);
    if states.is_empty() {
        return None;
    }
    Some(
        states
            .iter()
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

impl GleanService {
    /// Insert or overwrite the record for `article_id`.
    ///
    /// `facets: None` keeps whatever facets are stored. The analysis time is
    /// stamped only for terminal statuses.
    pub async fn upsert_analysis_by_article(
        &self,
        article_id: i64,
        status: AnalysisStatus,
        facets: Option<&AnalysisFacets>,
        error_message: Option<&str>,
    ) -> Result<AnalysisRecord, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let analysis_time = status.is_terminal().then(|| now.clone());
        let (core, structure, thoughts, related) = match facets {
            Some(f) => (
                Some(f.core_viewpoints.as_str()),
                Some(f.file_structure.as_str()),
                Some(f.author_thoughts.as_str()),
                Some(f.related_materials.as_str()),
            ),
            None => (None, None, None, None),
        };

        self.db()
            .conn()
            .execute(
                "INSERT INTO article_analyses (article_id, core_viewpoints, file_structure,
                    author_thoughts, related_materials, analysis_status, analysis_time,
                    error_message, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
                 ON CONFLICT(article_id) DO UPDATE SET
                    core_viewpoints = COALESCE(excluded.core_viewpoints, core_viewpoints),
                    file_structure = COALESCE(excluded.file_structure, file_structure),
                    author_thoughts = COALESCE(excluded.author_thoughts, author_thoughts),
                    related_materials = COALESCE(excluded.related_materials, related_materials),
                    analysis_status = excluded.analysis_status,
                    analysis_time = COALESCE(excluded.analysis_time, analysis_time),
                    error_message = excluded.error_message,
                    updated_at = excluded.updated_at",
                libsql::params![
                    article_id,
                    core,
                    structure,
                    thoughts,
                    related,
                    status.as_str(),
                    analysis_time.as_deref(),
                    error_message,
                    now.as_str()
                ],
            )
            .await?;

        self.get_analysis_by_article(article_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// The record for `article_id`, or `None` if none was ever created.
    pub async fn get_analysis_by_article(
        &self,
        article_id: i64,
    ) -> Result<Option<AnalysisRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM article_analyses WHERE article_id = ?1"),
                [article_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    /// Move the record to `status`, storing `error_message` (`None` clears it).
    ///
    /// Applies only if the current status may transition to `status`; returns
    /// whether a row changed. Terminal statuses stamp the analysis time, other
    /// statuses leave it untouched.
    pub async fn update_analysis_status(
        &self,
        article_id: i64,
        status: AnalysisStatus,
        error_message: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let Some(previous) = previous_states_sql(status) else {
            return Ok(false);
        };
        let now = format_timestamp(Utc::now());
        let time_clause = if status.is_terminal() {
            "analysis_time = ?3,"
        } else {
            ""
        };

        let affected = self
            .db()
            .conn()
            .execute(
                &format!(
                    "UPDATE article_analyses
                     SET analysis_status = ?1, error_message = ?2, {time_clause} updated_at = ?3
                     WHERE article_id = ?4 AND analysis_status IN ({previous})"
                ),
                libsql::params![status.as_str(), error_message, now.as_str(), article_id],
            )
            .await?;

        tracing::debug!(article_id, status = %status, applied = affected > 0, "status update");
        Ok(affected > 0)
    }

    /// Claim the article for a new execution.
    ///
    /// Creates the record as `processing`, or flips an existing non-processing
    /// record to `processing` and clears its error, in one statement. Returns
    /// the claim's attempt number, or `None` if the record was already
    /// `processing`.
    pub async fn begin_analysis_processing(
        &self,
        article_id: i64,
    ) -> Result<Option<i64>, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO article_analyses
                    (article_id, analysis_status, attempt, created_at, updated_at)
                 VALUES (?1, 'processing', 1, ?2, ?2)
                 ON CONFLICT(article_id) DO UPDATE SET
                    analysis_status = 'processing',
                    error_message = NULL,
                    attempt = article_analyses.attempt + 1,
                    updated_at = excluded.updated_at
                 WHERE article_analyses.analysis_status <> 'processing'
                 RETURNING attempt",
                libsql::params![article_id, now.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<i64>(0)?)),
            None => Ok(None),
        }
    }

    /// Refresh `updated_at` if `attempt` still holds the `processing` claim.
    pub async fn touch_analysis_processing(
        &self,
        article_id: i64,
        attempt: i64,
    ) -> Result<bool, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE article_analyses SET updated_at = ?1
                 WHERE article_id = ?2 AND analysis_status = 'processing' AND attempt = ?3",
                libsql::params![now.as_str(), article_id, attempt],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Write the facets and mark the record `completed` with its error cleared.
    ///
    /// Applies only while `attempt` holds the `processing` claim; returns
    /// whether it did.
    pub async fn complete_analysis(
        &self,
        article_id: i64,
        attempt: i64,
        facets: &AnalysisFacets,
    ) -> Result<bool, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE article_analyses
                 SET core_viewpoints = ?1, file_structure = ?2, author_thoughts = ?3,
                     related_materials = ?4, analysis_status = 'completed',
                     error_message = NULL, analysis_time = ?5, updated_at = ?5
                 WHERE article_id = ?6 AND analysis_status = 'processing' AND attempt = ?7",
                libsql::params![
                    facets.core_viewpoints.as_str(),
                    facets.file_structure.as_str(),
                    facets.author_thoughts.as_str(),
                    facets.related_materials.as_str(),
                    now.as_str(),
                    article_id,
                    attempt
                ],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Mark the record `failed` with `message`, keeping any stored facets.
    ///
    /// Applies only while `attempt` holds the `processing` claim.
    pub async fn fail_analysis(
        &self,
        article_id: i64,
        attempt: i64,
        message: &str,
    ) -> Result<bool, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE article_analyses
                 SET analysis_status = 'failed', error_message = ?1,
                     analysis_time = ?2, updated_at = ?2
                 WHERE article_id = ?3 AND analysis_status = 'processing' AND attempt = ?4",
                libsql::params![message, now.as_str(), article_id, attempt],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Records still `processing` that were last touched before `cutoff`.
    pub async fn list_stale_processing(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<AnalysisRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM article_analyses
                     WHERE analysis_status = 'processing' AND updated_at < ?1
                     ORDER BY updated_at"
                ),
                [format_timestamp(cutoff)],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }

    /// Mark every record returned by [`Self::list_stale_processing`] as `failed`.
    ///
    /// Returns the number of records changed.
    pub async fn fail_stale_processing(
        &self,
        cutoff: DateTime<Utc>,
        message: &str,
    ) -> Result<u64, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE article_analyses
                 SET analysis_status = 'failed', error_message = ?1,
                     analysis_time = ?2, updated_at = ?2
                 WHERE analysis_status = 'processing' AND updated_at < ?3",
                libsql::params![message, now.as_str(), format_timestamp(cutoff)],
            )
            .await?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{seed_article, test_service};
    use pretty_assertions::assert_eq;

    fn facets(tag: &str) -> AnalysisFacets {
        AnalysisFacets {
            core_viewpoints: format!("{tag}-core"),
            file_structure: format!("{tag}-structure"),
            author_thoughts: format!("{tag}-thoughts"),
            related_materials: format!("{tag}-related"),
        }
    }

    async fn claim(svc: &GleanService, article_id: i64) -> i64 {
        svc.begin_analysis_processing(article_id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn begin_creates_processing_record() {
        let svc = test_service().await;
        let article = seed_article(&svc, "fresh").await;

        assert_eq!(svc.begin_analysis_processing(article.id).await.unwrap(), Some(1));

        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Processing);
        assert_eq!(record.facets(), None);
        assert!(record.analysis_time.is_none());
        assert!(record.error_message.is_none());
    }

    #[tokio::test]
    async fn begin_refuses_while_processing() {
        let svc = test_service().await;
        let article = seed_article(&svc, "busy").await;

        assert!(svc.begin_analysis_processing(article.id).await.unwrap().is_some());
        assert_eq!(svc.begin_analysis_processing(article.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn begin_reclaims_failed_record_and_clears_error() {
        let svc = test_service().await;
        let article = seed_article(&svc, "retry").await;
        svc.begin_analysis_processing(article.id).await.unwrap();
        svc.update_analysis_status(article.id, AnalysisStatus::Failed, Some("boom"))
            .await
            .unwrap();

        assert_eq!(svc.begin_analysis_processing(article.id).await.unwrap(), Some(2));
        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Processing);
        assert!(record.error_message.is_none());
    }

    #[tokio::test]
    async fn begin_for_missing_article_violates_foreign_key() {
        let svc = test_service().await;
        assert!(svc.begin_analysis_processing(404).await.is_err());
    }

    #[tokio::test]
    async fn complete_writes_facets_and_stamps_time() {
        let svc = test_service().await;
        let article = seed_article(&svc, "done").await;
        let attempt = claim(&svc, article.id).await;

        assert!(svc.complete_analysis(article.id, attempt, &facets("v1")).await.unwrap());

        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Completed);
        assert_eq!(record.facets(), Some(facets("v1")));
        assert!(record.analysis_time.is_some());
    }

    #[tokio::test]
    async fn complete_ignored_unless_processing() {
        let svc = test_service().await;
        let article = seed_article(&svc, "late").await;
        let attempt = claim(&svc, article.id).await;
        svc.update_analysis_status(article.id, AnalysisStatus::Failed, Some("interrupted"))
            .await
            .unwrap();

        assert!(!svc.complete_analysis(article.id, attempt, &facets("late")).await.unwrap());
        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Failed);
        assert_eq!(record.facets(), None);
    }

    #[tokio::test]
    async fn failure_keeps_previous_facets() {
        let svc = test_service().await;
        let article = seed_article(&svc, "keep").await;
        let attempt = claim(&svc, article.id).await;
        svc.complete_analysis(article.id, attempt, &facets("v1")).await.unwrap();

        svc.begin_analysis_processing(article.id).await.unwrap();
        svc.update_analysis_status(article.id, AnalysisStatus::Failed, Some("timeout"))
            .await
            .unwrap();

        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some("timeout"));
        assert_eq!(record.facets(), Some(facets("v1")));
    }

    #[tokio::test]
    async fn touch_leaves_analysis_time() {
        let svc = test_service().await;
        let article = seed_article(&svc, "again").await;
        let attempt = claim(&svc, article.id).await;
        svc.complete_analysis(article.id, attempt, &facets("v1")).await.unwrap();
        let stamped = svc
            .get_analysis_by_article(article.id)
            .await
            .unwrap()
            .unwrap()
            .analysis_time;

        let attempt = claim(&svc, article.id).await;
        assert!(svc.touch_analysis_processing(article.id, attempt).await.unwrap());
        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.analysis_time, stamped);
    }

    #[tokio::test]
    async fn disallowed_transition_is_refused() {
        let svc = test_service().await;
        let article = seed_article(&svc, "strict").await;
        svc.upsert_analysis_by_article(article.id, AnalysisStatus::Completed, Some(&facets("x")), None)
            .await
            .unwrap();

        assert!(
            !svc.update_analysis_status(article.id, AnalysisStatus::Failed, Some("no"))
                .await
                .unwrap()
        );
        assert!(
            !svc.update_analysis_status(article.id, AnalysisStatus::Pending, None)
                .await
                .unwrap()
        );
        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Completed);
    }

    #[tokio::test]
    async fn upsert_keeps_facets_when_none_given() {
        let svc = test_service().await;
        let article = seed_article(&svc, "upsert").await;

        let first = svc
            .upsert_analysis_by_article(article.id, AnalysisStatus::Completed, Some(&facets("a")), None)
            .await
            .unwrap();
        let second = svc
            .upsert_analysis_by_article(article.id, AnalysisStatus::Pending, None, Some("queued"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, AnalysisStatus::Pending);
        assert_eq!(second.facets(), Some(facets("a")));
        assert_eq!(second.analysis_time, first.analysis_time);
        assert_eq!(second.error_message.as_deref(), Some("queued"));
    }

    #[tokio::test]
    async fn stale_processing_is_failed() {
        let svc = test_service().await;
        let stuck = seed_article(&svc, "stuck").await;
        let done = seed_article(&svc, "done").await;
        svc.begin_analysis_processing(stuck.id).await.unwrap();
        let attempt = claim(&svc, done.id).await;
        svc.complete_analysis(done.id, attempt, &facets("d")).await.unwrap();

        let cutoff = Utc::now() + chrono::Duration::seconds(1);
        let stale = svc.list_stale_processing(cutoff).await.unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].article_id, stuck.id);

        let failed = svc.fail_stale_processing(cutoff, "interrupted").await.unwrap();
        assert_eq!(failed, 1);
        let record = svc.get_analysis_by_article(stuck.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some("interrupted"));
        assert!(record.analysis_time.is_some());
    }

    #[tokio::test]
    async fn recent_processing_is_not_stale() {
        let svc = test_service().await;
        let article = seed_article(&svc, "fresh").await;
        svc.begin_analysis_processing(article.id).await.unwrap();

        let cutoff = Utc::now() - chrono::Duration::minutes(15);
        assert!(svc.list_stale_processing(cutoff).await.unwrap().is_empty());
        assert_eq!(svc.fail_stale_processing(cutoff, "x").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn superseded_attempt_cannot_write() {
        let svc = test_service().await;
        let article = seed_article(&svc, "superseded").await;
        let first = claim(&svc, article.id).await;
        let cutoff = Utc::now() + chrono::Duration::seconds(1);
        svc.fail_stale_processing(cutoff, "interrupted").await.unwrap();
        let second = claim(&svc, article.id).await;
        assert_eq!(second, first + 1);

        assert!(!svc.touch_analysis_processing(article.id, first).await.unwrap());
        assert!(!svc.complete_analysis(article.id, first, &facets("old")).await.unwrap());
        assert!(!svc.fail_analysis(article.id, first, "old").await.unwrap());

        assert!(svc.touch_analysis_processing(article.id, second).await.unwrap());
        assert!(svc.complete_analysis(article.id, second, &facets("new")).await.unwrap());
        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Completed);
        assert_eq!(record.facets(), Some(facets("new")));
    }

    #[tokio::test]
    async fn touch_refuses_reconciled_record() {
        let svc = test_service().await;
        let article = seed_article(&svc, "reconciled").await;
        let attempt = claim(&svc, article.id).await;
        let cutoff = Utc::now() + chrono::Duration::seconds(1);
        svc.fail_stale_processing(cutoff, "interrupted").await.unwrap();

        assert!(!svc.touch_analysis_processing(article.id, attempt).await.unwrap());
        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some("interrupted"));
    }

    #[tokio::test]
    async fn fail_keeps_facets_and_stamps_time() {
        let svc = test_service().await;
        let article = seed_article(&svc, "fail").await;
        let attempt = claim(&svc, article.id).await;
        svc.complete_analysis(article.id, attempt, &facets("v1")).await.unwrap();
        let attempt = claim(&svc, article.id).await;

        assert!(svc.fail_analysis(article.id, attempt, "boom").await.unwrap());
        let record = svc.get_analysis_by_article(article.id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some("boom"));
        assert_eq!(record.facets(), Some(facets("v1")));
        assert!(record.analysis_time.is_some());
    }

    #[tokio::test]
    async fn deleting_article_cascades() {
        let svc = test_service().await;
        let article = seed_article(&svc, "cascade").await;
        svc.begin_analysis_processing(article.id).await.unwrap();

        svc.delete_article(article.id).await.unwrap();
        assert!(svc.get_analysis_by_article(article.id).await.unwrap().is_none());
    }
}
