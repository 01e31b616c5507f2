//! AI vendor port - one implementation per language-model vendor.
//!
//! Each vendor accepts an ordered list of chat turns and returns the
//! generated text plus best-effort token accounting. Vendor-specific wire
//! errors are normalized into [`AiError`] so the gateway and callers see a
//! uniform taxonomy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a chat turn sent to a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

/// One turn of vendor-agnostic chat input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

/// A completed vendor response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Generated text.
    pub content: String,
    /// Total tokens consumed, `0` when the vendor does not report usage.
    pub tokens_used: u32,
}

/// Port implemented once per language-model vendor.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generates a reply for the given ordered turns.
    async fn generate(&self, turns: &[ChatTurn]) -> Result<Completion, AiError>;

    /// Stable identifier used for vendor selection (e.g. "groq").
    fn vendor_id(&self) -> &'static str;
}

/// Normalized vendor failure taxonomy.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    /// Request exceeded the per-call deadline.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Vendor rejected the request for rate reasons.
    #[error("rate limited by vendor")]
    RateLimited,

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Vendor reachable but failing (5xx and friends).
    #[error("vendor unavailable: {0}")]
    Unavailable(String),

    /// Could not reach the vendor at all.
    #[error("network error: {0}")]
    Network(String),

    /// Vendor replied with something we could not decode.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request itself was malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No vendor registered under the requested selector.
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),
}

impl AiError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True for failures a caller could reasonably retry. This core never
    /// retries on its own; retry policy belongs to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AiError::Timeout { .. }
                | AiError::RateLimited
                | AiError::Unavailable(_)
                | AiError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_constructors_set_roles() {
        assert_eq!(ChatTurn::system("s").role, TurnRole::System);
        assert_eq!(ChatTurn::user("u").role, TurnRole::User);
        assert_eq!(ChatTurn::assistant("a").role, TurnRole::Assistant);
    }

    #[test]
    fn retryable_classification() {
        assert!(AiError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(AiError::RateLimited.is_retryable());
        assert!(AiError::network("down").is_retryable());

        assert!(!AiError::AuthenticationFailed.is_retryable());
        assert!(!AiError::parse("bad json").is_retryable());
        assert!(!AiError::UnknownVendor("gemini".to_string()).is_retryable());
    }

    #[test]
    fn turn_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TurnRole::User).unwrap(), "\"user\"");
    }
}
