use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_ANTHROPIC_ENDPOINT, DEFAULT_ANTHROPIC_MODEL, LlmSettings};
use crate::error::CompletionError;
use crate::llm::{CompletionService, DEFAULT_SYSTEM_PROMPT};

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Messages endpoint
    pub endpoint: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
    /// Timeout for a single request
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, CompletionError> {
        if settings.api_key.trim().is_empty() {
            return Err(CompletionError::NotConfigured(
                "Anthropic API key is missing. Set ANTHROPIC_API_KEY.".to_string(),
            ));
        }

        Ok(Self {
            api_key: settings.api_key.trim().to_string(),
            model: non_empty_or(&settings.model, DEFAULT_ANTHROPIC_MODEL),
            endpoint: non_empty_or(&settings.endpoint, DEFAULT_ANTHROPIC_ENDPOINT),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

pub(crate) fn non_empty_or(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Initialization(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Send a message to Claude and get the text of the reply
    pub async fn send_message(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(system.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        Ok(extract_text(&response))
    }
}

/// Concatenate the text blocks of a response
///
/// A response with no text blocks at all is an empty completion, not an
/// error; stages turn it into their empty-result value.
fn extract_text(response: &AnthropicResponse) -> String {
    response
        .content
        .iter()
        .filter(|c| c.content_type == "text")
        .map(|c| c.text.as_str())
        .collect::<String>()
        .trim()
        .to_string()
}

#[async_trait]
impl CompletionService for AnthropicClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, CompletionError> {
        self.send_message(system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT), prompt)
            .await
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_uses_defaults() {
        let settings = LlmSettings {
            api_key: " sk-test ".to_string(),
            ..Default::default()
        };
        let config = AnthropicConfig::from_settings(&settings).unwrap();

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ANTHROPIC_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_extract_text_joins_blocks() {
        let json = r#"{"content": [
            {"type": "text", "text": "Kim, "},
            {"type": "tool_use"},
            {"type": "text", "text": "Lee"}
        ]}"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(&response), "Kim, Lee");
    }

    #[test]
    fn test_extract_text_empty_block_is_empty_completion() {
        let json = r#"{"content": [{"type": "text", "text": ""}]}"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(&response), "");
    }

    #[test]
    fn test_extract_text_without_text_blocks_is_empty_completion() {
        for json in [r#"{"content": []}"#, r#"{"content": [{"type": "tool_use"}]}"#] {
            let response: AnthropicResponse = serde_json::from_str(json).unwrap();
            assert_eq!(extract_text(&response), "");
        }
    }
}
