//! AI vendor configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI vendor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Groq API key
    pub groq_api_key: Option<String>,

    /// Cohere API key
    pub cohere_api_key: Option<String>,

    /// Groq model identifier
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// Cohere model identifier
    #[serde(default = "default_cohere_model")]
    pub cohere_model: String,

    /// Vendor used when a request does not name one
    #[serde(default = "default_vendor")]
    pub default_vendor: String,

    /// Per-call request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Groq is configured
    pub fn has_groq(&self) -> bool {
        self.groq_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Cohere is configured
    pub fn has_cohere(&self) -> bool {
        self.cohere_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_groq() && !self.has_cohere() {
            return Err(ValidationError::NoVendorConfigured);
        }

        let default_has_key = match self.default_vendor.as_str() {
            "groq" => self.has_groq(),
            "cohere" => self.has_cohere(),
            _ => false,
        };
        if !default_has_key {
            return Err(ValidationError::DefaultVendorMissingKey(
                self.default_vendor.clone(),
            ));
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            cohere_api_key: None,
            groq_model: default_groq_model(),
            cohere_model: default_cohere_model(),
            default_vendor: default_vendor(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_groq_model() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_cohere_model() -> String {
    "command-r-08-2024".to_string()
}

fn default_vendor() -> String {
    "groq".to_string()
}

fn default_timeout() -> u64 {
    30
}
