//! LLM service for feedback generation
//!
//! Talks to an Ollama-compatible `/api/generate` endpoint. One request per
//! run, non-streaming, bounded by a fixed timeout. Failures are returned to
//! the caller and never retried.

use crate::config::AppConfig;
use crate::error::{AgllmError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Anything that can turn a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}

/// Configuration for the Ollama client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL, e.g. `http://ollama:11434`
    pub host: String,

    /// Model to use (default: llama3.2:3b)
    pub model: String,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            host: config.ollama_host.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Full URL of the generation endpoint
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.host.trim_end_matches('/'))
    }
}

/// Ollama `/api/generate` request body
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama `/api/generate` response body (non-streaming)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for a locally hosted Ollama server
pub struct OllamaClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.host.trim().is_empty() {
            return Err(AgllmError::Config("Ollama host is empty".to_string()));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.config.generate_url();
        info!("Requesting feedback from {} (model {})", url, self.config.model);
        debug!("Prompt length: {} bytes", prompt.len());

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgllmError::LlmApi(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AgllmError::LlmApi(format!("Failed to parse response: {}", e)))?;

        debug!("Received {} bytes of feedback", body.response.len());
        Ok(body.response)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
