use clap::{Args, Subcommand};

use crate::cli::subcommands::{AnalysisCommands, ArticleCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Ingest, inspect and delete articles.
    Article {
        #[command(subcommand)]
        action: ArticleCommands,
    },
    /// Submit articles for analysis and wait for the results.
    Analyze(AnalyzeArgs),
    /// Inspect analysis results and task status.
    Analysis {
        #[command(subcommand)]
        action: AnalysisCommands,
    },
    /// Print the JSON Schema of an output type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    /// Article ids to analyze.
    #[arg(required = true)]
    pub ids: Vec<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. analysis-record or status-report.
    pub type_name: String,
}
