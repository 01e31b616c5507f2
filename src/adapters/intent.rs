//! Keyword-based intent detector.
//!
//! A local default for the intent detection port so the binary runs without
//! an external classifier. High intent is signalled by purchase language,
//! medium by browsing language; everything else stays low. Preference
//! extraction pulls a budget ("under 2000"), an occasion, and a category
//! out of the message when present.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::conversation::{ConversationRecord, IntentLevel};
use crate::ports::{IntentDetector, IntentSignal};

const HIGH_INTENT: &[&str] = &[
    "buy",
    "order",
    "checkout",
    "purchase",
    "add to cart",
    "i'll take",
    "take it",
    "i want this",
    "how do i pay",
];

const MEDIUM_INTENT: &[&str] = &[
    "looking for",
    "show me",
    "browse",
    "recommend",
    "suggest",
    "do you have",
    "i need",
    "searching for",
];

const OCCASIONS: &[&str] = &[
    "wedding", "party", "office", "casual", "festive", "beach", "date", "workout",
];

const CATEGORIES: &[&str] = &[
    "dress", "top", "bottom", "co-ord", "accessor", "jeans", "skirt", "saree", "kurta",
];

/// Keyword classifier implementing [`IntentDetector`].
pub struct KeywordIntentDetector;

impl KeywordIntentDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KeywordIntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentDetector for KeywordIntentDetector {
    async fn detect(&self, text: &str, _conversation: &ConversationRecord) -> IntentSignal {
        let lower = text.to_lowercase();

        let intent = if HIGH_INTENT.iter().any(|k| lower.contains(k)) {
            IntentLevel::High
        } else if MEDIUM_INTENT.iter().any(|k| lower.contains(k)) {
            IntentLevel::Medium
        } else {
            IntentLevel::Low
        };

        let preferences = extract_preferences(&lower);

        IntentSignal {
            intent,
            preferences,
        }
    }
}

fn extract_preferences(lower: &str) -> Option<BTreeMap<String, String>> {
    let mut prefs = BTreeMap::new();

    if let Some(budget) = extract_budget(lower) {
        prefs.insert("budget".to_string(), budget);
    }

    if let Some(occasion) = OCCASIONS.iter().find(|o| lower.contains(*o)) {
        prefs.insert("occasion".to_string(), (*occasion).to_string());
    }

    if let Some(category) = CATEGORIES.iter().find(|c| lower.contains(*c)) {
        prefs.insert("category".to_string(), (*category).to_string());
    }

    if prefs.is_empty() {
        None
    } else {
        Some(prefs)
    }
}

/// Pulls "under 2000" / "below 1500" style phrases out of the message.
fn extract_budget(lower: &str) -> Option<String> {
    for marker in ["under ", "below ", "less than ", "within "] {
        if let Some(idx) = lower.find(marker) {
            let rest = &lower[idx + marker.len()..];
            let digits: String = rest
                .trim_start_matches(['₹', '$', ' '])
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if !digits.is_empty() {
                return Some(format!("under {digits}"));
            }
        }
    }
    None
}
