//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("No AI vendor configured")]
    NoVendorConfigured,

    #[error("Default AI vendor '{0}' has no API key configured")]
    DefaultVendorMissingKey(String),

    #[error("Sync interval must be at least 60 seconds")]
    InvalidSyncInterval,

    #[error("Shopify store domain must not include a scheme")]
    InvalidStoreDomain,
}
