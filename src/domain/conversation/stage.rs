//! Dialogue stages and the stage transition engine.
//!
//! The stage determines how the assistant behaves on the current turn.
//! `next_stage` is a pure function of `(message_count, intent_level, text)`;
//! rules are evaluated in order and the first match wins:
//!
//! 1. First interaction (count ≤ 2) → `Hook`
//! 2. High intent → `Recommend`
//! 3. Policy/support keyword in the message → `Support`
//! 4. Count-based progression: engage → confirm → recommend → convert
//!
//! `Support` and `Recommend` are the only non-monotonic overrides: a late
//! low-intent policy question still routes to support regardless of how far
//! the conversation has progressed.

use serde::{Deserialize, Serialize};

use super::IntentLevel;

/// The dialogue phase presented to the user on a given turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// First impression: welcome and spark curiosity.
    #[default]
    Hook,
    /// Learn what the customer is looking for.
    Engage,
    /// Reflect their needs back before showing products.
    Confirm,
    /// Present matching products.
    Recommend,
    /// Handle objections and make buying easy.
    Convert,
    /// Answer policy and order questions.
    Support,
}

impl Stage {
    /// Returns the lowercase wire label for this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::Engage => "engage",
            Self::Confirm => "confirm",
            Self::Recommend => "recommend",
            Self::Convert => "convert",
            Self::Support => "support",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords that route a message to the `Support` stage.
///
/// Matched case-insensitively as substrings of the incoming message.
const POLICY_KEYWORDS: &[&str] = &[
    "cod",
    "cash on delivery",
    "delivery",
    "shipping",
    "return",
    "exchange",
    "refund",
    "policy",
    "how long",
    "when will",
    "track",
    "contact",
    "support",
    "help",
    "size chart",
    "payment",
];

/// Returns true if the message asks about store policy or order support.
pub fn is_policy_question(text: &str) -> bool {
    let lower = text.to_lowercase();
    POLICY_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Computes the stage for the turn that just received a user message.
///
/// `message_count` includes the just-appended user message. Deterministic:
/// no state is read or written here.
pub fn next_stage(message_count: usize, intent: IntentLevel, text: &str) -> Stage {
    if message_count <= 2 {
        return Stage::Hook;
    }

    if intent == IntentLevel::High {
        return Stage::Recommend;
    }

    if is_policy_question(text) {
        return Stage::Support;
    }

    match message_count {
        0..=4 => Stage::Engage,
        5..=6 => Stage::Confirm,
        7..=10 => Stage::Recommend,
        _ => Stage::Convert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_message_is_hook() {
        assert_eq!(next_stage(1, IntentLevel::Low, "Hi"), Stage::Hook);
        assert_eq!(next_stage(2, IntentLevel::Low, "hello"), Stage::Hook);
    }

    #[test]
    fn hook_wins_over_high_intent_and_policy() {
        assert_eq!(next_stage(1, IntentLevel::High, "buy now"), Stage::Hook);
        assert_eq!(next_stage(2, IntentLevel::Low, "return policy?"), Stage::Hook);
    }

    #[test]
    fn high_intent_skips_to_recommend() {
        assert_eq!(
            next_stage(6, IntentLevel::High, "show me dresses"),
            Stage::Recommend
        );
        assert_eq!(next_stage(15, IntentLevel::High, "anything"), Stage::Recommend);
    }

    #[test]
    fn policy_question_routes_to_support_at_any_length() {
        assert_eq!(
            next_stage(3, IntentLevel::Low, "what's your return policy?"),
            Stage::Support
        );
        assert_eq!(
            next_stage(25, IntentLevel::Medium, "when will my order arrive"),
            Stage::Support
        );
    }

    #[test]
    fn count_based_progression() {
        assert_eq!(next_stage(3, IntentLevel::Low, "just browsing"), Stage::Engage);
        assert_eq!(next_stage(4, IntentLevel::Low, "red ones"), Stage::Engage);
        assert_eq!(next_stage(5, IntentLevel::Low, "yes that"), Stage::Confirm);
        assert_eq!(next_stage(6, IntentLevel::Low, "exactly"), Stage::Confirm);
        assert_eq!(next_stage(7, IntentLevel::Low, "ok"), Stage::Recommend);
        assert_eq!(next_stage(10, IntentLevel::Low, "ok"), Stage::Recommend);
        assert_eq!(next_stage(11, IntentLevel::Low, "hmm"), Stage::Convert);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(is_policy_question("Is COD available?"));
        assert!(is_policy_question("SHIPPING cost?"));
        assert!(!is_policy_question("I like blue dresses"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Stage::Recommend).unwrap(), "\"recommend\"");
    }

    proptest! {
        /// Same inputs always yield the same stage.
        #[test]
        fn next_stage_is_deterministic(
            count in 0usize..40,
            intent_idx in 0u8..3,
            text in ".{0,80}",
        ) {
            let intent = match intent_idx {
                0 => IntentLevel::Low,
                1 => IntentLevel::Medium,
                _ => IntentLevel::High,
            };
            let a = next_stage(count, intent, &text);
            let b = next_stage(count, intent, &text);
            prop_assert_eq!(a, b);
        }

        /// The hook rule always wins on the first exchange.
        #[test]
        fn short_conversations_always_hook(
            count in 0usize..=2,
            intent_idx in 0u8..3,
            text in ".{0,80}",
        ) {
            let intent = match intent_idx {
                0 => IntentLevel::Low,
                1 => IntentLevel::Medium,
                _ => IntentLevel::High,
            };
            prop_assert_eq!(next_stage(count, intent, &text), Stage::Hook);
        }
    }
}
