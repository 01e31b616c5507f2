//! AIGateway - uniform contract over the configured language-model vendors.
//!
//! Vendors register under a string id; a request either names one or falls
//! through to the configured default. The gateway normalizes the response
//! shape and surfaces vendor failures as classified [`AiError`]s. It never
//! falls back across vendors on its own: selection is explicit per call,
//! and a caller wanting fallback catches the error and re-invokes with a
//! different selector.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ports::{AiError, AiProvider, ChatTurn, TurnRole};

/// Normalized reply from whichever vendor served the request.
#[derive(Debug, Clone)]
pub struct GatewayReply {
    /// Generated text.
    pub content: String,
    /// Id of the vendor that produced it.
    pub vendor_used: String,
    /// Tokens consumed, `0` when the vendor does not report usage.
    pub tokens_used: u32,
}

/// Registry of vendor adapters with a configured default.
pub struct AiGateway {
    vendors: HashMap<String, Arc<dyn AiProvider>>,
    default_vendor: String,
}

impl AiGateway {
    /// Creates a gateway with the given default vendor id.
    pub fn new(default_vendor: impl Into<String>) -> Self {
        Self {
            vendors: HashMap::new(),
            default_vendor: default_vendor.into(),
        }
    }

    /// Registers a vendor under its own id.
    pub fn register(mut self, provider: Arc<dyn AiProvider>) -> Self {
        self.vendors.insert(provider.vendor_id().to_string(), provider);
        self
    }

    /// Returns the ids of all registered vendors.
    pub fn vendor_ids(&self) -> Vec<&str> {
        self.vendors.keys().map(String::as_str).collect()
    }

    /// Generates a reply using the selected (or default) vendor.
    ///
    /// `recent_turns` is the trimmed conversation history, latest user
    /// message included; the system prompt is prepended here.
    pub async fn generate(
        &self,
        system_prompt: &str,
        recent_turns: &[ChatTurn],
        vendor: Option<&str>,
    ) -> Result<GatewayReply, AiError> {
        let selector = vendor.unwrap_or(&self.default_vendor);
        let provider = self
            .vendors
            .get(selector)
            .ok_or_else(|| AiError::UnknownVendor(selector.to_string()))?;

        let mut turns = Vec::with_capacity(recent_turns.len() + 1);
        turns.push(ChatTurn::new(TurnRole::System, system_prompt));
        turns.extend_from_slice(recent_turns);

        debug!(vendor = selector, turns = turns.len(), "dispatching completion");

        match provider.generate(&turns).await {
            Ok(completion) => Ok(GatewayReply {
                content: completion.content,
                vendor_used: selector.to_string(),
                tokens_used: completion.tokens_used,
            }),
            Err(err) => {
                warn!(vendor = selector, error = %err, "vendor call failed");
                Err(err)
            }
        }
    }
}
