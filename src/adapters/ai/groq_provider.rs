//! Groq vendor adapter.
//!
//! Speaks Groq's OpenAI-compatible chat completions API. Non-streaming;
//! Groq reports total token usage in the response body.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{AiError, AiProvider, ChatTurn, Completion, TurnRole};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Configuration for the Groq provider.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    api_key: Secret<String>,
    /// Model to use (e.g. "llama-3.1-70b-versatile").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GroqConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama-3.1-70b-versatile".to_string(),
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

/// Groq API provider implementation.
pub struct GroqProvider {
    config: GroqConfig,
    client: Client,
}

impl GroqProvider {
    /// Creates a new Groq provider with the given configuration.
    pub fn new(config: GroqConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_wire_request(&self, turns: &[ChatTurn]) -> GroqRequest {
        GroqRequest {
            model: self.config.model.clone(),
            messages: turns
                .iter()
                .map(|t| GroqMessage {
                    role: role_str(t.role).to_string(),
                    content: t.content.clone(),
                })
                .collect(),
            temperature: 0.7,
            max_tokens: 2048,
            stream: false,
        }
    }

    fn classify_send_error(&self, err: reqwest::Error) -> AiError {
        if err.is_timeout() {
            AiError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if err.is_connect() {
            AiError::network(format!("connection failed: {err}"))
        } else {
            AiError::network(err.to_string())
        }
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

fn role_str(role: TurnRole) -> &'static str {
    match role {
        TurnRole::System => "system",
        TurnRole::User => "user",
        TurnRole::Assistant => "assistant",
    }
}

#[async_trait]
impl AiProvider for GroqProvider {
    async fn generate(&self, turns: &[ChatTurn]) -> Result<Completion, AiError> {
        let request = self.to_wire_request(turns);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let response = self.classify_status(response).await?;
        let wire: GroqResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(format!("failed to decode response: {e}")))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::parse("no choices in response"))?;

        Ok(Completion {
            content: choice.message.content,
            tokens_used: wire.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }

    fn vendor_id(&self) -> &'static str {
        "groq"
    }
}

// ----- Groq wire types -----

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = GroqConfig::new("gsk-test")
            .with_model("llama-3.1-8b-instant")
            .with_base_url("https://custom.groq.test")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.base_url, "https://custom.groq.test");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.api_key(), "gsk-test");
    }

    #[test]
    fn wire_request_maps_roles() {
        let provider = GroqProvider::new(GroqConfig::new("k")).unwrap();
        let request = provider.to_wire_request(&[
            ChatTurn::system("s"),
            ChatTurn::user("u"),
            ChatTurn::assistant("a"),
        ]);

        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[2].role, "assistant");
        assert!(!request.stream);
        assert_eq!(request.max_tokens, 2048);
    }

    #[test]
    fn response_decodes_with_and_without_usage() {
        let with: GroqResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}],"usage":{"total_tokens":42}}"#,
        )
        .unwrap();
        assert_eq!(with.usage.unwrap().total_tokens, 42);

        let without: GroqResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#,
        )
        .unwrap();
        assert!(without.usage.is_none());
    }

    #[test]
    fn vendor_id_is_groq() {
        let provider = GroqProvider::new(GroqConfig::new("k")).unwrap();
        assert_eq!(provider.vendor_id(), "groq");
    }
}
