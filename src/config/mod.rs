//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `NAINA_` prefix and nested values use underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use naina::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod database;
mod error;
mod server;
mod shopify;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;
pub use shopify::ShopifyConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// AI vendor configuration (Groq/Cohere)
    #[serde(default)]
    pub ai: AiConfig,

    /// Shopify store configuration (catalog sync)
    #[serde(default)]
    pub shopify: ShopifyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables use the `NAINA_` prefix with `__` as the section separator,
    /// e.g. `NAINA_DATABASE__URL`, `NAINA_AI__GROQ_API_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("NAINA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validate all configuration sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.ai.validate()?;
        self.shopify.validate()?;
        Ok(())
    }
}
