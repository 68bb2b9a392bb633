//! # glean-db
//!
//! libSQL storage for glean: uploaded articles and the single analysis
//! record kept per article.
//!
//! Repository methods live on [`service::GleanService`]. The analysis
//! repository owns the conditional writes that keep at most one execution
//! per article in flight.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
pub struct GleanDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl GleanDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let glean_db = Self { db, conn };
        glean_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(glean_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> GleanDb {
        GleanDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in ["articles", "article_analyses"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn foreign_keys_enabled() {
        let db = test_db().await;
        let mut rows = db.conn().query("PRAGMA foreign_keys", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn status_check_constraint() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO articles (title, author, content, source_path, file_size,
                    upload_time, created_at, updated_at)
                 VALUES ('t', 'a', 'c', 'p', 1, 'x', 'x', 'x')",
                (),
            )
            .await
            .unwrap();
        let result = db
            .conn()
            .execute(
                "INSERT INTO article_analyses (article_id, analysis_status, created_at, updated_at)
                 VALUES (1, 'queued', 'x', 'x')",
                (),
            )
            .await;
        assert!(result.is_err(), "unknown status should violate CHECK");
    }

    #[tokio::test]
    async fn analysis_requires_existing_article() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO article_analyses (article_id, analysis_status, created_at, updated_at)
                 VALUES (99, 'pending', 'x', 'x')",
                (),
            )
            .await;
        assert!(result.is_err(), "dangling article_id should violate FK");
    }
}
