use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glean_config::{GleanConfig, LogConfig, PROJECT_DIR};

mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

const LOG_ENV: &str = "GLEAN_LOG";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("glean error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    ui::init(&flags);

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let project_dir = flags
        .config_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(PROJECT_DIR));
    let config = GleanConfig::load_with_dotenv_from(&project_dir)
        .with_context(|| format!("failed to load configuration from {}", project_dir.display()))?;

    init_tracing(&flags, &config.log)?;
    context::warn_unconfigured(&config, matches!(cli.command, cli::Commands::Analyze(_)));

    let ctx = context::AppContext::init(config)
        .await
        .context("failed to initialize glean application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(flags: &cli::GlobalFlags, log: &LogConfig) -> anyhow::Result<()> {
    let level = if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        log.level.as_str()
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let installed = if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    installed.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
