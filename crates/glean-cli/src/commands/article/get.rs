use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let article = ctx
        .service()
        .get_article(id)
        .await?
        .with_context(|| format!("article {id} not found"))?;
    output(&article, flags.format)
}
