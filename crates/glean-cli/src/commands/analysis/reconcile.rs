use std::time::Duration;

use glean_core::responses::ReconcileResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(stale_after: Option<u64>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stale_after_secs = stale_after.unwrap_or(ctx.config.analysis.stale_after_secs);
    let failed = ctx
        .orchestrator
        .reconcile_stale(Duration::from_secs(stale_after_secs))
        .await?;
    output(
        &ReconcileResponse {
            stale_after_secs,
            failed,
        },
        flags.format,
    )
}
