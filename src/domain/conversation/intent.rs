//! Buyer-readiness intent levels.

use serde::{Deserialize, Serialize};

/// Coarse buyer-readiness classification produced by intent detection.
///
/// High intent short-circuits the normal stage progression straight to
/// product recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntentLevel {
    /// Browsing, no purchase signal.
    #[default]
    Low,
    /// Interested but undecided.
    Medium,
    /// Ready to buy.
    High,
}

impl IntentLevel {
    /// Returns the lowercase wire label for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for IntentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_intent_is_low() {
        assert_eq!(IntentLevel::default(), IntentLevel::Low);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&IntentLevel::High).unwrap(), "\"high\"");
    }

    #[test]
    fn deserializes_lowercase() {
        let level: IntentLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(level, IntentLevel::Medium);
    }
}
