use std::path::Path;

use anyhow::{Context, bail};
use glean_core::ingest::{MAX_FILE_SIZE, prepare_article};
use glean_core::responses::ArticleSummary;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    file: &Path,
    title: Option<&str>,
    author: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let metadata = tokio::fs::metadata(file)
        .await
        .with_context(|| format!("failed to stat {}", file.display()))?;
    if usize::try_from(metadata.len()).map_or(true, |len| len > MAX_FILE_SIZE) {
        bail!(
            "{} is {} bytes; the limit is {MAX_FILE_SIZE}",
            file.display(),
            metadata.len()
        );
    }

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let new = prepare_article(file, bytes, title, author)?;

    if ctx.service().article_exists_by_title(&new.title).await? {
        bail!("an article titled '{}' already exists", new.title);
    }

    let article = ctx.service().create_article(&new).await?;
    tracing::info!(id = article.id, title = %article.title, "article ingested");

    output(&ArticleSummary::from(&article), flags.format)
}
