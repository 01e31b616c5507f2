//! Intent detection port.
//!
//! Intent classification and preference extraction are external concerns;
//! the orchestrator consumes them as a black box. Implementations must be
//! infallible: when analysis breaks down, degrade to low intent with no
//! preferences rather than fail the turn.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::conversation::{ConversationRecord, IntentLevel};

/// The outcome of analyzing one user message.
#[derive(Debug, Clone, Default)]
pub struct IntentSignal {
    /// Buyer-readiness classification.
    pub intent: IntentLevel,
    /// Preferences extracted from the message, if any.
    pub preferences: Option<BTreeMap<String, String>>,
}

/// Port for the external intent/preference extractor.
#[async_trait]
pub trait IntentDetector: Send + Sync {
    /// Classifies the incoming message in the context of the conversation
    /// so far.
    async fn detect(&self, text: &str, conversation: &ConversationRecord) -> IntentSignal;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_detector_is_object_safe() {
        fn _accepts_dyn(_detector: &dyn IntentDetector) {}
    }

    #[test]
    fn default_signal_is_low_with_no_preferences() {
        let signal = IntentSignal::default();
        assert_eq!(signal.intent, IntentLevel::Low);
        assert!(signal.preferences.is_none());
    }
}
