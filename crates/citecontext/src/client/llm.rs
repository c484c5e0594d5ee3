//! OpenAI-compatible chat completion client (`{api_base}/chat/completions`).
//!
//! One round-trip per call. Transient failures (429, 5xx, timeouts) are
//! retried by the middleware; other 4xx responses fail immediately.

use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::check_status;
use crate::config::LlmConfig;
use crate::error::{ClientError, ClientResult};

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

/// Reasoning models also send `reasoning_content`; only `content` is kept.
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completion client.
#[derive(Clone)]
pub struct LlmClient {
    client: ClientWithMiddleware,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmClient {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::CONTENT_TYPE, "application/json".parse()?);
        headers.insert(reqwest::header::AUTHORIZATION, format!("Bearer {}", config.api_key).parse()?);
        // Some OpenAI-like gateways only look at one of these.
        headers.insert("x-api-key", config.api_key.parse()?);
        headers.insert("api-key", config.api_key.parse()?);

        let client = Client::builder().default_headers(headers).timeout(config.timeout).build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(2), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `messages` and return the first choice's content, trimmed.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> ClientResult<String> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: max_tokens.unwrap_or(self.max_tokens),
            temperature: temperature.unwrap_or(self.temperature),
        };
        let body = serde_json::to_string(&payload)?;

        debug!(model = %self.model, messages = messages.len(), body_len = body.len(), "sending LLM request");

        let response = self.client.post(&self.endpoint).body(body).send().await?;
        let response = check_status(response).await?;
        let text = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(ClientError::NoChoices(text));
        };

        Ok(choice.message.and_then(|m| m.content).unwrap_or_default().trim().to_string())
    }
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}
