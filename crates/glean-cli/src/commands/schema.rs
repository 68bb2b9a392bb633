use anyhow::Context;
use glean_core::entities::{AnalysisRecord, AnalysisTask, Article};
use glean_core::responses::{
    AnalyzeResponse, ArticleSummary, DeleteResponse, ReconcileResponse, StatusReport,
};
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

pub const TYPE_NAMES: [&str; 8] = [
    "article",
    "article-summary",
    "analysis-record",
    "analysis-task",
    "status-report",
    "analyze-response",
    "reconcile-response",
    "delete-response",
];

/// Handle `glean schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_for_type(&args.type_name).with_context(|| {
        format!(
            "unknown type '{}'; expected one of: {}",
            args.type_name,
            TYPE_NAMES.join(", ")
        )
    })?;
    output(&schema, flags.format)
}

fn schema_for_type(name: &str) -> Option<Schema> {
    let schema = match name {
        "article" => schema_for!(Article),
        "article-summary" => schema_for!(ArticleSummary),
        "analysis-record" => schema_for!(AnalysisRecord),
        "analysis-task" => schema_for!(AnalysisTask),
        "status-report" => schema_for!(StatusReport),
        "analyze-response" => schema_for!(AnalyzeResponse),
        "reconcile-response" => schema_for!(ReconcileResponse),
        "delete-response" => schema_for!(DeleteResponse),
        _ => return None,
    };
    Some(schema)
}
