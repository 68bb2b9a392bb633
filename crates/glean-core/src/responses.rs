//! CLI response types returned as JSON by `glean` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AnalysisRecord, AnalysisTask, Article};
use crate::enums::AnalysisStatus;

/// Response from `glean analysis status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusReport {
    pub task_id: String,
    pub status: AnalysisStatus,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    /// The degraded report for a task with no analysis record.
    #[must_use]
    pub fn unknown(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            status: AnalysisStatus::Pending,
            progress: 0,
            error: None,
        }
    }

    #[must_use]
    pub fn from_record(task_id: &str, record: &AnalysisRecord) -> Self {
        Self {
            task_id: task_id.to_string(),
            status: record.status,
            progress: record.status.progress(),
            error: record.error_message.clone(),
        }
    }
}

/// Article listing entry; omits the full content.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub file_size: i64,
    pub upload_time: chrono::DateTime<chrono::Utc>,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            author: article.author.clone(),
            file_size: article.file_size,
            upload_time: article.upload_time,
        }
    }
}

/// Response from `glean analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnalyzeResponse {
    pub submitted: Vec<AnalysisTask>,
    pub rejected: Vec<SubmitRejection>,
    pub reports: Vec<StatusReport>,
}

/// A submission that was refused synchronously.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubmitRejection {
    pub article_id: i64,
    pub reason: String,
}

/// Response from `glean analysis reconcile`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReconcileResponse {
    pub stale_after_secs: u64,
    pub failed: u64,
}

/// Response from `glean article delete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeleteResponse {
    pub id: i64,
    pub deleted: bool,
}
