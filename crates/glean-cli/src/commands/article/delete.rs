use glean_core::responses::DeleteResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let deleted = ctx.service().delete_article(id).await?;
    if deleted {
        tracing::info!(id, "article deleted");
    } else {
        tracing::warn!(id, "article not found; nothing deleted");
    }
    output(&DeleteResponse { id, deleted }, flags.format)
}
