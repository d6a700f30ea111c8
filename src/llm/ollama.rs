use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL, LlmSettings};
use crate::error::CompletionError;
use crate::llm::anthropic::non_empty_or;
use crate::llm::{CompletionService, DEFAULT_SYSTEM_PROMPT};

/// Configuration for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL without trailing slash
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    /// Maximum tokens to generate (`num_predict`)
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl OllamaConfig {
    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self {
            endpoint: non_empty_or(&settings.endpoint, DEFAULT_OLLAMA_ENDPOINT)
                .trim_end_matches('/')
                .to_string(),
            model: non_empty_or(&settings.model, DEFAULT_OLLAMA_MODEL),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// Client for a locally served model
pub struct OllamaClient {
    http: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, CompletionError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Initialization(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn request_url(&self) -> String {
        format!("{}/api/generate", self.config.endpoint)
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, CompletionError> {
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            system: system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT),
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
                top_p: 0.9,
            },
        };

        let response = self.http.post(self.request_url()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        Ok(payload.response.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_predict: u32,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_trims_endpoint() {
        let settings = LlmSettings {
            provider: "ollama".to_string(),
            endpoint: "http://gpu-box:11434/".to_string(),
            ..Default::default()
        };
        let config = OllamaConfig::from_settings(&settings);
        let client = OllamaClient::new(config).unwrap();

        assert_eq!(client.request_url(), "http://gpu-box:11434/api/generate");
        assert_eq!(client.config.model, DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn test_request_is_not_streaming() {
        let body = GenerateRequest {
            model: "m",
            prompt: "p",
            system: DEFAULT_SYSTEM_PROMPT,
            stream: false,
            options: GenerateOptions {
                temperature: 0.2,
                num_predict: 16,
                top_p: 0.9,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 16);
    }
}
