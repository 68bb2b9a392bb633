use anyhow::{Context, bail};
use glean_analysis::AnalysisError;
use glean_core::enums::AnalysisStatus;
use glean_core::responses::{AnalyzeResponse, SubmitRejection};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalyzeArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `glean analyze`: submit every id, wait for the executions, then
/// report the final status of each task.
pub async fn handle(args: &AnalyzeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let orchestrator = &ctx.orchestrator;
    let mut submitted = Vec::with_capacity(args.ids.len());
    let mut rejected = Vec::new();

    for &article_id in &args.ids {
        match orchestrator.submit(article_id).await {
            Ok(task) => {
                tracing::info!(task_id = %task.task_id, article_id, "analysis submitted");
                submitted.push(task);
            }
            Err(AnalysisError::Database(error)) => {
                // Let the executions already started reach a terminal state.
                orchestrator.wait_idle().await;
                return Err(error).with_context(|| format!("failed to submit article {article_id}"));
            }
            Err(error) => {
                tracing::warn!(article_id, %error, "submission rejected");
                rejected.push(SubmitRejection {
                    article_id,
                    reason: error.to_string(),
                });
            }
        }
    }

    if !submitted.is_empty() {
        let progress = Progress::spinner(&format!("analyzing {} article(s)", submitted.len()));
        orchestrator.wait_idle().await;
        progress.finish_clear();
    }

    let mut reports = Vec::with_capacity(submitted.len());
    for task in &submitted {
        reports.push(orchestrator.get_status(&task.task_id).await?);
    }

    let failed = reports
        .iter()
        .filter(|report| report.status == AnalysisStatus::Failed)
        .count();
    let rejected_count = rejected.len();

    output(
        &AnalyzeResponse {
            submitted,
            rejected,
            reports,
        },
        flags.format,
    )?;

    if rejected_count > 0 || failed > 0 {
        bail!("{rejected_count} submission(s) rejected, {failed} analysis(es) failed");
    }
    Ok(())
}
