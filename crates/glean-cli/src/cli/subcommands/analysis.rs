use clap::Subcommand;

/// Analysis commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AnalysisCommands {
    /// Show the stored analysis for an article.
    Get {
        id: i64,
        /// Print facets exactly as stored.
        #[arg(long)]
        plain: bool,
    },
    /// Poll the status of a submitted task.
    Status { task_id: String },
    /// Fail analyses stuck in processing.
    Reconcile {
        /// Age in seconds after which a processing record counts as stuck.
        #[arg(long)]
        stale_after: Option<u64>,
    },
}
