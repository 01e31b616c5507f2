//! Accumulated customer preferences.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Preference keys rendered first (and with friendly labels) in the
/// prompt summary. Anything else is appended verbatim.
const WELL_KNOWN_KEYS: &[(&str, &str)] = &[
    ("budget", "Budget"),
    ("occasion", "Occasion"),
    ("style", "Style"),
    ("category", "Looking for"),
];

/// Open mapping of preference keys to values, merged across turns.
///
/// Later values overwrite same-named earlier keys; keys absent from an
/// update are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(BTreeMap<String, String>);

impl UserProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no preferences have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a preference value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets a single preference.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Merges new preferences into the profile. Existing keys not present
    /// in `updates` are kept.
    pub fn merge(&mut self, updates: BTreeMap<String, String>) {
        self.0.extend(updates);
    }

    /// Renders the profile as a prompt block, or `None` when empty.
    pub fn summary(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }

        let mut out = String::from("CUSTOMER PREFERENCES:\n");
        for (key, label) in WELL_KNOWN_KEYS {
            if let Some(value) = self.0.get(*key) {
                out.push_str(&format!("- {label}: {value}\n"));
            }
        }
        for (key, value) in &self.0 {
            if WELL_KNOWN_KEYS.iter().all(|(k, _)| k != key) {
                out.push_str(&format!("- {key}: {value}\n"));
            }
        }
        Some(out)
    }
}
