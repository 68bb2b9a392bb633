//! Task identifier formatting and parsing.
//!
//! A task id is a display handle, `task_{article_id}_{unix_seconds}`. It is not
//! tracked anywhere; status polling recovers the article id from it and reads
//! the analysis record.

use chrono::{DateTime, Utc};

use crate::errors::CoreError;

pub const TASK_PREFIX: &str = "task";

/// Build the task id for a submission of `article_id` at `submitted_at`.
#[must_use]
pub fn format_task_id(article_id: i64, submitted_at: DateTime<Utc>) -> String {
    format!("{TASK_PREFIX}_{article_id}_{}", submitted_at.timestamp())
}

/// Recover the article id embedded in a task id.
///
/// # Errors
///
/// Returns `CoreError::InvalidTaskId` unless the input is exactly
/// `task_<digits>_<digits>` with a positive article id.
pub fn parse_task_id(task_id: &str) -> Result<i64, CoreError> {
    let invalid = || CoreError::InvalidTaskId(task_id.to_string());

    let rest = task_id
        .strip_prefix(TASK_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .ok_or_else(invalid)?;
    let (article, stamp) = rest.split_once('_').ok_or_else(invalid)?;

    if !is_digits(article) || !is_digits(stamp) {
        return Err(invalid());
    }

    match article.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid()),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn format_embeds_article_and_seconds() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        assert_eq!(format_task_id(42, at), format!("task_42_{}", at.timestamp()));
    }

    #[test]
    fn parse_recovers_article_id() {
        let id = format_task_id(42, Utc::now());
        assert_eq!(parse_task_id(&id).unwrap(), 42);
    }

    #[rstest]
    #[case("")]
    #[case("task")]
    #[case("task_")]
    #[case("task_42")]
    #[case("task__1700000000")]
    #[case("task_abc_1700000000")]
    #[case("task_42_")]
    #[case("task_42_x")]
    #[case("task_-1_1700000000")]
    #[case("task_0_1700000000")]
    #[case("job_42_1700000000")]
    #[case("task_42_1700000000_extra")]
    #[case("task_99999999999999999999_1")]
    fn parse_rejects_malformed(#[case] input: &str) {
        assert!(
            matches!(parse_task_id(input), Err(CoreError::InvalidTaskId(_))),
            "{input:?} should be rejected"
        );
    }
}
