//! Shopify remote catalog adapter.

mod client;

pub use client::{DisabledCatalogClient, ShopifyClient, ShopifyClientConfig};
