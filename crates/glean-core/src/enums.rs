//! Status enum for the analysis lifecycle.
//!
//! Uses `snake_case` serialization so the stored and wire values are the closed
//! string set `{pending, processing, completed, failed}`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// AnalysisStatus
// ---------------------------------------------------------------------------

/// Status of an article's analysis record.
///
/// ```text
/// (none) → processing → completed → processing (resubmitted)
///                     → failed    → processing (resubmitted)
/// pending → processing
///         → failed (reconciled)
/// ```
///
/// `processing → processing` is allowed so a running execution can re-assert
/// its own state. Acquiring `processing` from another submission goes through
/// the conditional guard in the store, not through this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Failed,
    ];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing, Self::Failed],
            Self::Processing => &[Self::Processing, Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => &[Self::Processing],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// States from which `next` may be entered.
    #[must_use]
    pub fn allowed_previous_states(next: Self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|state| state.can_transition_to(next))
            .collect()
    }

    /// `completed` and `failed` end an execution and stamp the analysis time.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Advisory progress indicator for status polling.
    #[must_use]
    pub const fn progress(self) -> u8 {
        match self {
            Self::Completed => 100,
            Self::Processing => 50,
            Self::Pending | Self::Failed => 0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(AnalysisStatus::Pending, "pending")]
    #[case(AnalysisStatus::Processing, "processing")]
    #[case(AnalysisStatus::Completed, "completed")]
    #[case(AnalysisStatus::Failed, "failed")]
    fn serde_uses_stored_strings(#[case] status: AnalysisStatus, #[case] expected: &str) {
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{expected}\""));
        assert_eq!(status.as_str(), expected);
        assert_eq!(expected.parse::<AnalysisStatus>().unwrap(), status);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "running".parse::<AnalysisStatus>().unwrap_err();
        assert_eq!(err, CoreError::UnknownStatus("running".into()));
    }

    #[rstest]
    #[case(AnalysisStatus::Completed, 100)]
    #[case(AnalysisStatus::Processing, 50)]
    #[case(AnalysisStatus::Pending, 0)]
    #[case(AnalysisStatus::Failed, 0)]
    fn progress_mapping(#[case] status: AnalysisStatus, #[case] progress: u8) {
        assert_eq!(status.progress(), progress);
    }

    #[test]
    fn terminal_states_can_be_resubmitted() {
        assert!(AnalysisStatus::Completed.can_transition_to(AnalysisStatus::Processing));
        assert!(AnalysisStatus::Failed.can_transition_to(AnalysisStatus::Processing));
        assert!(!AnalysisStatus::Completed.can_transition_to(AnalysisStatus::Failed));
        assert!(!AnalysisStatus::Failed.can_transition_to(AnalysisStatus::Completed));
    }

    #[test]
    fn completed_is_only_reachable_from_processing() {
        assert_eq!(
            AnalysisStatus::allowed_previous_states(AnalysisStatus::Completed),
            vec![AnalysisStatus::Processing]
        );
    }

    #[test]
    fn failed_is_reachable_from_pending_and_processing() {
        assert_eq!(
            AnalysisStatus::allowed_previous_states(AnalysisStatus::Failed),
            vec![AnalysisStatus::Pending, AnalysisStatus::Processing]
        );
    }

    #[test]
    fn nothing_transitions_back_to_pending() {
        assert!(AnalysisStatus::allowed_previous_states(AnalysisStatus::Pending).is_empty());
    }

    #[test]
    fn terminal_flags() {
        assert!(AnalysisStatus::Completed.is_terminal());
        assert!(AnalysisStatus::Failed.is_terminal());
        assert!(!AnalysisStatus::Pending.is_terminal());
        assert!(!AnalysisStatus::Processing.is_terminal());
    }
}
