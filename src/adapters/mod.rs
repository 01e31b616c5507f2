//! Adapters - concrete implementations of the ports.

pub mod ai;
pub mod http;
pub mod intent;
pub mod knowledge;
pub mod memory;
pub mod postgres;
pub mod shopify;

pub use intent::KeywordIntentDetector;
pub use knowledge::StoreKnowledgeAggregator;
