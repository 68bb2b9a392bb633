mod format;
mod get;
mod reconcile;
mod status;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AnalysisCommands;
use crate::context::AppContext;

/// Handle `glean analysis`.
pub async fn handle(
    action: &AnalysisCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AnalysisCommands::Get { id, plain } => get::run(*id, *plain, ctx, flags).await,
        AnalysisCommands::Status { task_id } => status::run(task_id, ctx, flags).await,
        AnalysisCommands::Reconcile { stale_after } => {
            reconcile::run(*stale_after, ctx, flags).await
        }
    }
}
