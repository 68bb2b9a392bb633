//! Article repository: create, read, list, delete.

use chrono::Utc;

use glean_core::entities::{Article, NewArticle};

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, parse_datetime};
use crate::service::GleanService;

const SELECT_COLS: &str =
    "id, title, author, content, source_path, file_size, upload_time, created_at, updated_at";

fn row_to_article(row: &libsql::Row) -> Result<Article, DatabaseError> {
    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        content: row.get(3)?,
        source_path: row.get(4)?,
        file_size: row.get(5)?,
        upload_time: parse_datetime(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl GleanService {
    pub async fn create_article(&self, new: &NewArticle) -> Result<Article, DatabaseError> {
        let now = Utc::now();
        let stamp = format_timestamp(now);

        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO articles (title, author, content, source_path, file_size,
                    upload_time, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING id",
                libsql::params![
                    new.title.as_str(),
                    new.author.as_str(),
                    new.content.as_str(),
                    new.source_path.as_str(),
                    new.file_size,
                    stamp.as_str(),
                    stamp.as_str(),
                    stamp.as_str()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let id: i64 = row.get(0)?;

        tracing::info!(article_id = id, title = %new.title, "article created");

        Ok(Article {
            id,
            title: new.title.clone(),
            author: new.author.clone(),
            content: new.content.clone(),
            source_path: new.source_path.clone(),
            file_size: new.file_size,
            upload_time: now,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch an article, or `None` if it does not exist.
    pub async fn get_article(&self, id: i64) -> Result<Option<Article>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM articles WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_article(&row)?)),
            None => Ok(None),
        }
    }

    /// Newest first, optionally restricted to one author.
    pub async fn list_articles(
        &self,
        limit: u32,
        author: Option<&str>,
    ) -> Result<Vec<Article>, DatabaseError> {
        let mut rows = match author {
            Some(author) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM articles WHERE author = ?1
                             ORDER BY upload_time DESC, id DESC LIMIT ?2"
                        ),
                        libsql::params![author, i64::from(limit)],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM articles
                             ORDER BY upload_time DESC, id DESC LIMIT ?1"
                        ),
                        [i64::from(limit)],
                    )
                    .await?
            }
        };

        let mut articles = Vec::new();
        while let Some(row) = rows.next().await? {
            articles.push(row_to_article(&row)?);
        }
        Ok(articles)
    }

    /// Delete an article and, through the foreign key, its analysis record.
    ///
    /// Returns `false` if no article had this id.
    pub async fn delete_article(&self, id: i64) -> Result<bool, DatabaseError> {
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM articles WHERE id = ?1", [id])
            .await?;
        if affected > 0 {
            tracing::info!(article_id = id, "article deleted");
        }
        Ok(affected > 0)
    }

    pub async fn article_exists_by_title(&self, title: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT EXISTS(SELECT 1 FROM articles WHERE title = ?1)",
                [title],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)? != 0)
    }
}
