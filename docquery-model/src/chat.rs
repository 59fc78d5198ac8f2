//! OpenAI-compatible chat completion client.
//!
//! Works against any service exposing the `/v1/chat/completions` wire shape
//! (OpenAI, Azure-hosted deployments, Core42, vLLM, ...). Only
//! `choices[0].message.content` of the response is consumed.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::completion::{CompletionModel, CompletionRequest};
use crate::error::{ModelError, Result};

/// The default chat completions endpoint.
pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default model identifier.
const DEFAULT_MODEL: &str = "gpt-4o";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Extraction demands near-zero temperature; the config rejects anything
/// above this so the output stays machine-parseable.
const MAX_TEMPERATURE: f32 = 0.1;

/// Configuration for a [`ChatClient`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Bearer token for the service.
    pub api_key: String,
    /// Full URL of the chat completions endpoint.
    pub url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature. Must stay within `0.0..=0.1`.
    pub temperature: f32,
    /// Per-request timeout; expiry follows the transport error path.
    pub timeout: Duration,
}

impl ChatConfig {
    /// Create a config for the default OpenAI endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: DEFAULT_CHAT_URL.to_string(),
            model: model.into(),
            temperature: 0.0,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a compatible non-OpenAI endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the sampling temperature (validated on client construction).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A [`CompletionModel`] backed by an OpenAI-compatible chat completions API.
///
/// Sends exactly one non-streaming request per call. Credentials and
/// endpoints are always supplied externally — via [`ChatConfig`] or
/// [`ChatClient::from_env`] — never compiled in.
#[derive(Debug)]
pub struct ChatClient {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Create a new client from the given config.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] if the API key is empty, the
    /// temperature is outside `0.0..=0.1`, or the HTTP client cannot be
    /// constructed.
    pub fn new(config: ChatConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ModelError::Config("API key must not be empty".into()));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&config.temperature) {
            return Err(ModelError::Config(format!(
                "temperature {} outside the deterministic band 0.0..={MAX_TEMPERATURE}",
                config.temperature
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    ///
    /// Reads `DOCQUERY_LLM_API_KEY` (required), `DOCQUERY_LLM_URL` and
    /// `DOCQUERY_LLM_MODEL` (optional, defaulting to the OpenAI endpoint
    /// and `gpt-4o`).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DOCQUERY_LLM_API_KEY").map_err(|_| {
            ModelError::Config("DOCQUERY_LLM_API_KEY environment variable not set".into())
        })?;
        let mut config = ChatConfig::new(
            api_key,
            std::env::var("DOCQUERY_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        );
        if let Ok(url) = std::env::var("DOCQUERY_LLM_URL") {
            config = config.with_url(url);
        }
        Self::new(config)
    }

    /// The temperature that will actually be sent for a request: the
    /// request's override when set, the configured value otherwise.
    fn effective_temperature(&self, request: &CompletionRequest) -> f32 {
        request.temperature.unwrap_or(self.config.temperature)
    }
}

// ── Chat API request/response types ────────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── CompletionModel implementation ─────────────────────────────────

#[async_trait]
impl CompletionModel for ChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(instruction) = &request.system_instruction {
            messages.push(ChatMessage { role: "system", content: instruction });
        }
        messages.push(ChatMessage { role: &request.role, content: &request.content });

        let body = ChatRequest {
            model: &self.config.model,
            stream: false,
            messages,
            temperature: self.effective_temperature(request),
        };

        debug!(
            model = %self.config.model,
            content_len = request.content.len(),
            has_system = request.system_instruction.is_some(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.config.model, error = %e, "completion request failed");
                ModelError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(model = %self.config.model, %status, "completion API error");
            return Err(ModelError::Api { status: status.as_u16(), message });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.config.model, error = %e, "failed to parse completion response");
            ModelError::EmptyResponse(e.to_string())
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ModelError::EmptyResponse("no choices in response".into()))
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        let err = ChatClient::new(ChatConfig::new("", "gpt-4o")).unwrap_err();
        assert!(matches!(err, ModelError::Config(_)));
    }

    #[test]
    fn rejects_creative_temperature() {
        let config = ChatConfig::new("key", "gpt-4o").with_temperature(0.7);
        let err = ChatClient::new(config).unwrap_err();
        assert!(matches!(err, ModelError::Config(_)));
    }

    #[test]
    fn accepts_deterministic_band() {
        for temperature in [0.0, 0.05, 0.1] {
            let config = ChatConfig::new("key", "gpt-4o").with_temperature(temperature);
            assert!(ChatClient::new(config).is_ok());
        }
    }

    #[test]
    fn request_temperature_overrides_configured_value() {
        let config = ChatConfig::new("key", "gpt-4o").with_temperature(0.0);
        let client = ChatClient::new(config).unwrap();

        let plain = CompletionRequest::user("q");
        assert_eq!(client.effective_temperature(&plain), 0.0);

        let overridden = CompletionRequest::user("q").with_temperature(0.05);
        assert_eq!(client.effective_temperature(&overridden), 0.05);
    }

    #[test]
    fn request_serializes_system_message_first() {
        let messages = vec![
            ChatMessage { role: "system", content: "be terse" },
            ChatMessage { role: "user", content: "hello" },
        ];
        let body =
            ChatRequest { model: "gpt-4o", stream: false, messages, temperature: 0.0 };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["stream"], serde_json::json!(false));
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
    }
}
