//! Shopify store configuration
//!
//! Catalog sync and remote search are optional: when the store domain or
//! access token is missing the service runs against the local catalog only.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Shopify store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyConfig {
    /// Store domain, e.g. "my-store.myshopify.com"
    pub store_domain: Option<String>,

    /// Admin API access token
    pub access_token: Option<String>,

    /// Admin API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Seconds between automatic catalog syncs
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,

    /// Products fetched per page during sync
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-call request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ShopifyConfig {
    /// Get sync interval as Duration
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check whether both credentials are present
    pub fn is_configured(&self) -> bool {
        self.store_domain.as_ref().is_some_and(|d| !d.is_empty())
            && self.access_token.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Validate Shopify configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(domain) = &self.store_domain {
            if domain.contains("://") {
                return Err(ValidationError::InvalidStoreDomain);
            }
        }
        if self.sync_interval_secs < 60 {
            return Err(ValidationError::InvalidSyncInterval);
        }
        Ok(())
    }
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            store_domain: None,
            access_token: None,
            api_version: default_api_version(),
            sync_interval_secs: default_sync_interval(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_version() -> String {
    "2024-01".to_string()
}

fn default_sync_interval() -> u64 {
    300
}

fn default_page_size() -> u32 {
    250
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_config_defaults() {
        let config = ShopifyConfig::default();
        assert_eq!(config.sync_interval_secs, 300);
        assert_eq!(config.page_size, 250);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_is_configured_requires_both_credentials() {
        let config = ShopifyConfig {
            store_domain: Some("shop.myshopify.com".to_string()),
            ..Default::default()
        };
        assert!(!config.is_configured());

        let config = ShopifyConfig {
            store_domain: Some("shop.myshopify.com".to_string()),
            access_token: Some("shpat_xxx".to_string()),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn test_validation_rejects_scheme_in_domain() {
        let config = ShopifyConfig {
            store_domain: Some("https://shop.myshopify.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_tight_interval() {
        let config = ShopifyConfig {
            sync_interval_secs: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
