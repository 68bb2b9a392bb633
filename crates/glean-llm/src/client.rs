//! OpenAI-compatible chat-completion client.

use std::time::Duration;

use async_trait::async_trait;
use glean_config::LlmConfig;
use glean_core::entities::AnalysisFacets;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ArticleAnalyzer;
use crate::error::LlmError;
use crate::extract::parse_analysis_reply;
use crate::prompt::{SYSTEM_PROMPT, build_analysis_prompt};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for one chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl LlmClient {
    /// Build a client from configuration. Empty base URL or model fall back
    /// to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Http` if the HTTP client cannot be constructed.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/chat/completions", config.api_base()),
            model: config.model().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one system + user exchange and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an upstream `LlmError` on transport failure, a non-success
    /// status, or a reply without choices.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending chat completion");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(LlmError::EmptyChoices)
    }
}

#[async_trait]
impl ArticleAnalyzer for LlmClient {
    async fn analyze_article(
        &self,
        content: &str,
        timeout: Duration,
    ) -> Result<AnalysisFacets, LlmError> {
        let prompt = build_analysis_prompt(content);
        let reply = tokio::time::timeout(timeout, self.complete(SYSTEM_PROMPT, &prompt))
            .await
            .map_err(|_| LlmError::Timeout(timeout))??;

        parse_analysis_reply(&reply).inspect_err(|e| {
            tracing::warn!(error = %e, reply_len = reply.len(), "could not parse analysis reply");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoint_uses_configured_base() {
        let config = LlmConfig {
            api_base: "http://localhost:1234/v1/".into(),
            model: "local".into(),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(client.model(), "local");
    }

    #[test]
    fn empty_settings_use_defaults() {
        let config = LlmConfig {
            api_base: String::new(),
            model: String::new(),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            format!("{}/chat/completions", glean_config::DEFAULT_API_BASE)
        );
        assert_eq!(client.model(), glean_config::DEFAULT_MODEL);
    }

    #[test]
    fn request_omits_unset_max_tokens() {
        let request = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: 0.5,
            max_tokens: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "u");
    }
}
