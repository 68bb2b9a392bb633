//! Service layer over the database handle.
//!
//! `GleanService` wraps `GleanDb`. Repository methods are implemented as
//! `impl GleanService` blocks in [`crate::repos`].

use crate::GleanDb;
use crate::error::DatabaseError;

pub struct GleanService {
    db: GleanDb,
}

impl GleanService {
    /// Create a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = GleanDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `GleanDb`.
    #[must_use]
    pub const fn from_db(db: GleanDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &GleanDb {
        &self.db
    }
}
