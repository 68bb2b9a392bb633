use crate::cli::GlobalFlags;
use crate::commands::analysis::format::format_facet;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(article_id: i64, plain: bool, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut record = ctx.orchestrator.get_result(article_id).await?;

    if !plain {
        for facet in [
            &mut record.core_viewpoints,
            &mut record.file_structure,
            &mut record.author_thoughts,
            &mut record.related_materials,
        ] {
            if let Some(text) = facet.as_mut() {
                *text = format_facet(text)?;
            }
        }
    }

    output(&record, flags.format)
}
