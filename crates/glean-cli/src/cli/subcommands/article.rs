use std::path::PathBuf;

use clap::Subcommand;

/// Article commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ArticleCommands {
    /// Ingest a .txt file.
    Add {
        file: PathBuf,
        /// Title to store instead of one taken from the text.
        #[arg(long)]
        title: Option<String>,
        /// Author to store instead of one taken from the text.
        #[arg(long)]
        author: Option<String>,
    },
    /// Get an article by ID, including its content.
    Get { id: i64 },
    /// List articles, newest first.
    List {
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete an article and its analysis.
    Delete { id: i64 },
}
