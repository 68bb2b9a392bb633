//! Chat-completion provider configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.moonshot.cn/v1";
pub const DEFAULT_MODEL: &str = "kimi-k2-0905-preview";

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Bearer token sent to the provider. Empty means requests go out
    /// unauthenticated and will most likely be rejected upstream.
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_base: String,

    #[serde(default)]
    pub model: String,

    /// Upper bound on one analysis request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

impl LlmConfig {
    /// Provider base URL without a trailing slash; falls back to the default.
    #[must_use]
    pub fn api_base(&self) -> &str {
        let base = self.api_base.trim().trim_end_matches('/');
        if base.is_empty() { DEFAULT_API_BASE } else { base }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() { DEFAULT_MODEL } else { model }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
