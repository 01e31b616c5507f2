//! Messages within a conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single turn in a conversation. Append-only once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Keys of products attached to this turn (assistant turns only).
    #[serde(default)]
    pub product_refs: Vec<String>,
    /// Number of grounding sources used to produce this turn.
    #[serde(default)]
    pub sources_used: u32,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            product_refs: Vec::new(),
            sources_used: 0,
            timestamp: Utc::now(),
        }
    }

    /// Creates an assistant message with attached product references.
    pub fn assistant(
        content: impl Into<String>,
        product_refs: Vec<String>,
        sources_used: u32,
    ) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            product_refs,
            sources_used,
            timestamp: Utc::now(),
        }
    }
}
