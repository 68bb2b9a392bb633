use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use glean_analysis::{AnalysisOrchestrator, OrchestratorOptions};
use glean_config::GleanConfig;
use glean_db::service::GleanService;
use glean_llm::LlmClient;

pub type Orchestrator = AnalysisOrchestrator<GleanService, LlmClient>;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: GleanConfig,
    pub orchestrator: Orchestrator,
}

impl AppContext {
    /// Open the database, build the LLM client and the orchestrator, then
    /// fail analyses left in `processing` by an earlier process.
    pub async fn init(config: GleanConfig) -> anyhow::Result<Self> {
        let db_path = Path::new(&config.database.path);
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let service = GleanService::new_local(&db_path.to_string_lossy())
            .await
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        let client = LlmClient::new(&config.llm).context("failed to build LLM client")?;
        tracing::debug!(model = client.model(), endpoint = client.endpoint(), "llm client ready");

        let orchestrator = AnalysisOrchestrator::new(
            service,
            client,
            OrchestratorOptions::from_config(&config.analysis, &config.llm),
        );

        if config.analysis.reconcile_on_startup {
            orchestrator
                .reconcile_stale(Duration::from_secs(config.analysis.stale_after_secs))
                .await
                .context("startup reconciliation failed")?;
        }

        Ok(Self {
            config,
            orchestrator,
        })
    }

    #[must_use]
    pub fn service(&self) -> &GleanService {
        self.orchestrator.store()
    }
}
