mod add;
mod delete;
mod get;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ArticleCommands;
use crate::context::AppContext;

/// Handle `glean article`.
pub async fn handle(
    action: &ArticleCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ArticleCommands::Add {
            file,
            title,
            author,
        } => add::run(file, title.as_deref(), author.as_deref(), ctx, flags).await,
        ArticleCommands::Get { id } => get::run(*id, ctx, flags).await,
        ArticleCommands::List { author, limit } => {
            list::run(author.as_deref(), *limit, ctx, flags).await
        }
        ArticleCommands::Delete { id } => delete::run(*id, ctx, flags).await,
    }
}
