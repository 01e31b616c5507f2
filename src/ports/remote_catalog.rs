//! Remote catalog port - the boundary to the external e-commerce platform.
//!
//! Implementations adapt the platform's wire format (HTML descriptions,
//! string prices, comma-separated tags) into the clean [`RemoteProduct`]
//! shape before it crosses this seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A product as reported by the remote platform, already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProduct {
    /// Platform-assigned product identity.
    pub key: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    /// Storefront URL for this product.
    pub url: Option<String>,
    /// Units on hand across the lead variant.
    pub quantity: i32,
    pub variants: Vec<RemoteVariant>,
}

/// A variant as reported by the remote platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteVariant {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub available: bool,
    pub sku: Option<String>,
    pub inventory_quantity: i32,
}

/// One page of a paginated product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductPage {
    pub products: Vec<RemoteProduct>,
    /// Opaque cursor for the next page; `None` means the listing is done.
    pub next_cursor: Option<String>,
}

/// A customer looked up on the remote platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCustomer {
    pub id: String,
    pub email: String,
}

/// How to attach a customer to a draft order.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerRef {
    /// An existing platform customer.
    Id(String),
    /// A customer known only by email.
    Email(String),
}

/// A line item on a draft order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub variant_id: String,
    pub quantity: u32,
}

/// A created draft order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftOrder {
    pub id: String,
    pub invoice_url: Option<String>,
    pub total_price: Option<String>,
}

/// Failures at the remote platform boundary.
///
/// The sync engine and search service catch these, log them, and degrade
/// (partial report / local fallback) rather than propagate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Remote integration is not configured or credentials failed at startup.
    #[error("remote catalog disabled")]
    Disabled,

    /// Platform reachable but returned an error status.
    #[error("remote catalog unavailable: status {status}: {message}")]
    Unavailable { status: u16, message: String },

    /// Could not reach the platform.
    #[error("network error: {0}")]
    Network(String),

    /// Response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Access token rejected.
    #[error("authentication failed")]
    AuthenticationFailed,
}

impl CatalogError {
    pub fn unavailable(status: u16, message: impl Into<String>) -> Self {
        Self::Unavailable {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// Port to the external platform's product, customer, and order APIs.
#[async_trait]
pub trait RemoteCatalogClient: Send + Sync {
    /// Fetches one page of up to `page_size` products, starting after the
    /// opaque `after` cursor when given.
    async fn list_products(
        &self,
        page_size: u32,
        after: Option<&str>,
    ) -> Result<ProductPage, CatalogError>;

    /// Searches live products, returning up to `limit` in platform order.
    async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RemoteProduct>, CatalogError>;

    /// Looks up a single product by its platform key.
    async fn get_product(&self, key: &str) -> Result<Option<RemoteProduct>, CatalogError>;

    /// Looks up a customer by email.
    async fn get_customer(&self, email: &str) -> Result<Option<RemoteCustomer>, CatalogError>;

    /// Creates a draft order. Thin passthrough; no order management here.
    async fn create_draft_order(
        &self,
        customer: CustomerRef,
        line_items: Vec<LineItem>,
        note: &str,
    ) -> Result<DraftOrder, CatalogError>;
}
