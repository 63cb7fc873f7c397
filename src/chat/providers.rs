use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{LlmConfig, ProviderConfig, ProviderSlot};

use super::types::{ChatError, ChatMessage};

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM providers.  Each provider takes a full conversation and
/// returns the assistant's reply text (empty when the model produced none).
pub trait LlmProvider: Send + Sync {
    /// Send the conversation to the LLM and return the response text.
    fn complete<'a>(
        &'a self,
        conversation: &'a [ChatMessage],
    ) -> Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>>;

    /// Provider name for logging / status reporting.
    fn name(&self) -> &str;

    /// Model identifier sent upstream.
    fn model(&self) -> &str;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible provider (Groq, OpenAI)
// ---------------------------------------------------------------------------

/// Works with any OpenAI-compatible chat-completions API.
#[derive(Debug)]
pub struct OpenAiCompatible {
    pub provider_name: String,
    pub slot: ProviderSlot,
    pub model: String,
    pub endpoint: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatible {
    pub fn new(
        config: &ProviderConfig,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ChatError::MissingApiKey(config.name.clone()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::ClientBuild(e.to_string()))?;

        Ok(Self {
            provider_name: config.name.clone(),
            slot: config.slot,
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            temperature,
            max_tokens,
            client,
        })
    }
}

impl LlmProvider for OpenAiCompatible {
    fn complete<'a>(
        &'a self,
        conversation: &'a [ChatMessage],
    ) -> Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>> {
        Box::pin(async move {
            let body = CompletionRequest {
                model: &self.model,
                messages: conversation,
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            };

            let resp = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| ChatError::RequestFailed(e.to_string()))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(ChatError::ProviderError(format!(
                    "{} returned {}: {}",
                    self.provider_name, status, text
                )));
            }

            let parsed: CompletionResponse = resp
                .json()
                .await
                .map_err(|e| ChatError::ParseError(e.to_string()))?;

            Ok(parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content)
                .unwrap_or_default())
        })
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build the ordered list of available providers. Providers without an API
/// key are left out entirely.
pub fn create_providers(config: &LlmConfig) -> Result<Vec<Arc<dyn LlmProvider>>, ChatError> {
    let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();
    for cfg in config.providers() {
        if !cfg.is_available() {
            continue;
        }
        let provider =
            OpenAiCompatible::new(cfg, config.temperature, config.max_tokens, config.timeout())?;
        providers.push(Arc::new(provider));
    }
    Ok(providers)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
