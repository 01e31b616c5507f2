//! Mock vendor for tests and local development.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::ports::{AiError, AiProvider, ChatTurn, Completion};

/// A scripted [`AiProvider`] that records what it was asked.
pub struct MockProvider {
    reply: Option<String>,
    calls: Mutex<Vec<Vec<ChatTurn>>>,
}

impl MockProvider {
    /// A provider that always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A provider that always fails with an unavailable error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of generate calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The turns from the most recent call. Panics if never called.
    pub fn last_turns(&self) -> Vec<ChatTurn> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("mock provider was never called")
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    async fn generate(&self, turns: &[ChatTurn]) -> Result<Completion, AiError> {
        self.calls.lock().unwrap().push(turns.to_vec());
        match &self.reply {
            Some(reply) => Ok(Completion {
                content: reply.clone(),
                tokens_used: 7,
            }),
            None => Err(AiError::unavailable("mock vendor configured to fail")),
        }
    }

    fn vendor_id(&self) -> &'static str {
        "mock"
    }
}
