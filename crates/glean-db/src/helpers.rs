//! Row-to-entity parsing helpers.
//!
//! Timestamps are written with [`format_timestamp`], a fixed-width RFC 3339
//! form, so `TEXT` comparisons in SQL order them correctly. Parsing still
//! accepts `SQLite`'s `datetime('now')` format for rows written by hand.

use chrono::{DateTime, SecondsFormat, Utc};
use glean_core::enums::AnalysisStatus;

use crate::error::DatabaseError;

/// Render a timestamp for storage: `2026-10-16T08:00:00.000000Z`.
#[must_use]
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse the `analysis_status` column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for a value outside the status set.
pub fn parse_status(s: &str) -> Result<AnalysisStatus, DatabaseError> {
    s.parse()
        .map_err(|e| DatabaseError::InvalidState(format!("analysis_status: {e}")))
}

/// Read a nullable TEXT column, keeping empty strings.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// Facet columns distinguish "never written" (NULL) from an empty facet.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_nullable_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    Ok(row.get::<Option<String>>(idx)?)
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}
