//! Cohere vendor adapter.
//!
//! Speaks Cohere's v1 chat API, which takes a single `message` rather than
//! a turn list; only the latest user message is sent. Cohere does not
//! report token usage on this endpoint, so `tokens_used` is always 0.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{AiError, AiProvider, ChatTurn, Completion};

const DEFAULT_BASE_URL: &str = "https://api.cohere.ai/v1";

/// Configuration for the Cohere provider.
#[derive(Debug, Clone)]
pub struct CohereConfig {
    api_key: Secret<String>,
    /// Model to use (e.g. "command-r-08-2024").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl CohereConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "command-r-08-2024".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Cohere API provider implementation.
pub struct CohereProvider {
    config: CohereConfig,
    client: Client,
}

impl CohereProvider {
    /// Creates a new Cohere provider with the given configuration.
    pub fn new(config: CohereConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat", self.config.base_url)
    }

    async fn classify_status(&self, response: Response) -> Result<Response, AiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(AiError::AuthenticationFailed),
            429 => Err(AiError::RateLimited),
            400 => Err(AiError::InvalidRequest(body)),
            500..=599 => Err(AiError::unavailable(format!("server error {status}: {body}"))),
            _ => Err(AiError::network(format!("unexpected status {status}: {body}"))),
        }
    }
}

#[async_trait]
impl AiProvider for CohereProvider {
    async fn generate(&self, turns: &[ChatTurn]) -> Result<Completion, AiError> {
        // Cohere v1 chat takes a single message; send the latest turn.
        let message = turns
            .last()
            .map(|t| t.content.clone())
            .ok_or_else(|| AiError::InvalidRequest("no turns to send".to_string()))?;

        let request = CohereRequest {
            model: self.config.model.clone(),
            message,
            temperature: 0.7,
            max_tokens: 2048,
        };

        let response = self
            .client
            .post(self.chat_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AiError::network(format!("connection failed: {e}"))
                } else {
                    AiError::network(e.to_string())
                }
            })?;

        let response = self.classify_status(response).await?;
        let wire: CohereResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(format!("failed to decode response: {e}")))?;

        Ok(Completion {
            content: wire.text,
            tokens_used: 0,
        })
    }

    fn vendor_id(&self) -> &'static str {
        "cohere"
    }
}

// ----- Cohere wire types -----

#[derive(Debug, Serialize)]
struct CohereRequest {
    model: String,
    message: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CohereResponse {
    text: String,
}
