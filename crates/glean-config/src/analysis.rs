//! Orchestrator tuning.

use serde::{Deserialize, Serialize};

const fn default_max_concurrent() -> usize {
    4
}

const fn default_queue_capacity() -> usize {
    16
}

const fn default_stale_after_secs() -> u64 {
    900
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Executions allowed to call the provider at the same time.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Accepted submissions that may wait for a free worker. Past
    /// `max_concurrent + queue_capacity` submissions are refused.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Age after which a `processing` record is considered abandoned.
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,

    #[serde(default = "default_true")]
    pub reconcile_on_startup: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            queue_capacity: default_queue_capacity(),
            stale_after_secs: default_stale_after_secs(),
            reconcile_on_startup: default_true(),
        }
    }
}
