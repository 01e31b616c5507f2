//! The per-session conversation aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{IntentLevel, Message, Stage, UserProfile};

/// Persisted dialogue state for one session.
///
/// Created on the first message for a session id. `messages` is append-only;
/// the record is persisted exactly once per successfully processed message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Opaque unique session identifier. Immutable once created.
    pub session_id: String,
    /// Ordered turns, oldest first.
    pub messages: Vec<Message>,
    /// Stage computed for the most recent turn.
    pub current_stage: Stage,
    /// Latest buyer-readiness classification.
    pub intent_level: IntentLevel,
    /// Accumulated customer preferences.
    pub user_profile: UserProfile,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last persisted.
    pub updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    /// Creates a fresh record for a session: hook stage, low intent,
    /// empty profile.
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            current_stage: Stage::Hook,
            intent_level: IntentLevel::Low,
            user_profile: UserProfile::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of messages, including both roles.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Appends a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Appends an assistant message with its attached product references.
    pub fn push_assistant(
        &mut self,
        content: impl Into<String>,
        product_refs: Vec<String>,
        sources_used: u32,
    ) {
        self.messages
            .push(Message::assistant(content, product_refs, sources_used));
    }

    /// Records the detected intent and merges extracted preferences.
    pub fn apply_intent(
        &mut self,
        intent: IntentLevel,
        preferences: Option<BTreeMap<String, String>>,
    ) {
        self.intent_level = intent;
        if let Some(prefs) = preferences {
            self.user_profile.merge(prefs);
        }
    }

    /// Returns the most recent `n` messages, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Marks the record as touched before persistence.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
