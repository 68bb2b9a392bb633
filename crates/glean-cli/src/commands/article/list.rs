use glean_core::responses::ArticleSummary;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::{DEFAULT_LIMIT, effective_limit};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    author: Option<&str>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(limit, flags.limit, DEFAULT_LIMIT);
    let articles = ctx.service().list_articles(limit, author).await?;
    let summaries = articles.iter().map(ArticleSummary::from).collect::<Vec<_>>();
    output(&summaries, flags.format)
}
