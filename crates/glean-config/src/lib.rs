//! # glean-config
//!
//! Layered configuration loading for glean using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GLEAN_*` prefix, `__` as separator)
//! 2. `OPENAI_API_KEY`, `OPENAI_API_BASE`, `OPENAI_MODEL` as aliases for `llm.*`
//! 3. Project-level `.glean/config.toml`
//! 4. User-level `~/.config/glean/config.toml`
//! 5. Built-in defaults
//!
//! # Usage
//!
//! ```no_run
//! use glean_config::GleanConfig;
//!
//! let config = GleanConfig::load_with_dotenv().expect("config");
//! println!("model: {}", config.llm.model());
//! ```

mod analysis;
mod database;
mod error;
mod llm;
mod log;

pub use analysis::AnalysisConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use llm::{DEFAULT_API_BASE, DEFAULT_MODEL, LlmConfig};
pub use log::LogConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default project directory holding `config.toml` and the database.
pub const PROJECT_DIR: &str = ".glean";

/// `GLEAN_LOG` carries a tracing filter, not a config key.
const LOG_FILTER_SUFFIX: &str = "LOG";

/// Provider-compatible variable names accepted as `llm.*` aliases.
pub const OPENAI_ALIASES: [&str; 3] = ["OPENAI_API_KEY", "OPENAI_API_BASE", "OPENAI_MODEL"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GleanConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl GleanConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(PROJECT_DIR))
    }

    /// Load with `project_dir/config.toml` as the project layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_from(project_dir: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for(project_dir).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.env` file from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_with_dotenv_from(Path::new(PROJECT_DIR))
    }

    /// Load a `.env` file from the current directory, then [`Self::load_from`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv_from(project_dir: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load_from(project_dir)
    }

    /// Build the figment provider chain for the default project directory.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new(PROJECT_DIR))
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment_for(project_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = project_dir.join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&OPENAI_ALIASES)
                    .map(|key| {
                        key.as_str()
                            .to_ascii_lowercase()
                            .replacen("openai_", "llm.", 1)
                            .into()
                    }),
            )
            .merge(Env::prefixed("GLEAN_").ignore(&[LOG_FILTER_SUFFIX]).split("__"))
    }

    /// Reject values the orchestrator and client cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.max_concurrent == 0 {
            return Err(ConfigError::invalid(
                "analysis.max_concurrent",
                "must be at least 1",
            ));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::invalid("llm.timeout_secs", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::invalid(
                "llm.temperature",
                "must be between 0.0 and 2.0",
            ));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("glean").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GleanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.path, ".glean/glean.db");
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
    }

    #[test]
    fn zero_workers_rejected() {
        let mut config = GleanConfig::default();
        config.analysis.max_concurrent = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analysis.max_concurrent"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = GleanConfig::default();
        config.llm.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "llm.timeout_secs"
        ));
    }

    #[test]
    fn out_of_range_temperature_rejected() {
        let mut config = GleanConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }
}
