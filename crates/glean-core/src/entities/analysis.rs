use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AnalysisStatus;

/// The four-facet analysis result. Absent keys decode as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisFacets {
    pub core_viewpoints: String,
    pub file_structure: String,
    pub author_thoughts: String,
    pub related_materials: String,
}

/// The single analysis record kept per article.
///
/// Facets stay `None` until the first successful execution and are only
/// overwritten by later successes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnalysisRecord {
    pub id: i64,
    pub article_id: i64,
    pub core_viewpoints: Option<String>,
    pub file_structure: Option<String>,
    pub author_thoughts: Option<String>,
    pub related_materials: Option<String>,
    #[serde(rename = "analysis_status")]
    pub status: AnalysisStatus,
    pub analysis_time: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// The stored facets, if any facet has been written.
    #[must_use]
    pub fn facets(&self) -> Option<AnalysisFacets> {
        if self.core_viewpoints.is_none()
            && self.file_structure.is_none()
            && self.author_thoughts.is_none()
            && self.related_materials.is_none()
        {
            return None;
        }
        Some(AnalysisFacets {
            core_viewpoints: self.core_viewpoints.clone().unwrap_or_default(),
            file_structure: self.file_structure.clone().unwrap_or_default(),
            author_thoughts: self.author_thoughts.clone().unwrap_or_default(),
            related_materials: self.related_materials.clone().unwrap_or_default(),
        })
    }
}

/// Handle returned by a submission. Not persisted; the record is the source
/// of truth.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnalysisTask {
    pub task_id: String,
    pub article_id: i64,
    pub status: AnalysisStatus,
}
