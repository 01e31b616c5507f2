//! Shopify Admin API adapter.
//!
//! Implements [`RemoteCatalogClient`] against the Shopify REST Admin API.
//! Pagination uses Shopify's cursor scheme: the next page cursor is the
//! `page_info` parameter carried in the response's `Link` header. Product
//! descriptions arrive as HTML and are stripped before crossing the port.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::ports::{
    CatalogError, CustomerRef, DraftOrder, LineItem, ProductPage, RemoteCatalogClient,
    RemoteCustomer, RemoteProduct, RemoteVariant,
};

/// Configuration for the Shopify client.
#[derive(Debug, Clone)]
pub struct ShopifyClientConfig {
    /// Store domain, e.g. "my-store.myshopify.com".
    pub store_domain: String,
    access_token: Secret<String>,
    /// Admin API version.
    pub api_version: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ShopifyClientConfig {
    pub fn new(store_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store_domain: store_domain.into(),
            access_token: Secret::new(access_token.into()),
            api_version: "2024-01".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

/// Shopify REST Admin API client.
pub struct ShopifyClient {
    config: ShopifyClientConfig,
    client: Client,
}

impl ShopifyClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: ShopifyClientConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "https://{}/admin/api/{}/{}",
            self.config.store_domain, self.config.api_version, path
        )
    }

    /// Verifies credentials by fetching shop metadata.
    pub async fn test_connection(&self) -> bool {
        match self.get(&self.api_url("shop.json"), &[]).await {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "shopify connection test failed");
                false
            }
        }
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response, CatalogError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("X-Shopify-Access-Token", self.config.access_token())
            .send()
            .await
            .map_err(classify_send_error)?;

        classify_status(response).await
    }

    fn storefront_url(&self, handle: &str) -> String {
        format!("https://{}/products/{}", self.config.store_domain, handle)
    }

    fn to_remote_product(&self, wire: WireProduct) -> RemoteProduct {
        let lead_variant = wire.variants.first();
        let price = lead_variant
            .and_then(|v| v.price.parse::<f64>().ok())
            .unwrap_or(0.0);
        let quantity = lead_variant.map(|v| v.inventory_quantity as i32).unwrap_or(0);

        RemoteProduct {
            key: wire.id.to_string(),
            name: wire.title,
            description: clean_html(wire.body_html.as_deref().unwrap_or_default()),
            price,
            category: wire.product_type.unwrap_or_default(),
            tags: wire
                .tags
                .unwrap_or_default()
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            image: wire.image.map(|i| i.src),
            url: Some(self.storefront_url(&wire.handle)),
            quantity,
            variants: wire
                .variants
                .into_iter()
                .map(|v| RemoteVariant {
                    id: v.id.to_string(),
                    title: v.title,
                    price: v.price.parse().unwrap_or(0.0),
                    available: v.inventory_quantity > 0,
                    sku: v.sku.filter(|s| !s.is_empty()),
                    inventory_quantity: v.inventory_quantity as i32,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl RemoteCatalogClient for ShopifyClient {
    async fn list_products(
        &self,
        page_size: u32,
        after: Option<&str>,
    ) -> Result<ProductPage, CatalogError> {
        let mut query = vec![("limit", page_size.to_string())];
        if let Some(cursor) = after {
            query.push(("page_info", cursor.to_string()));
        }

        let response = self.get(&self.api_url("products.json"), &query).await?;

        let next_cursor = response
            .headers()
            .get("link")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_page_info);

        let body: WireProductList = response
            .json()
            .await
            .map_err(|e| CatalogError::parse(format!("failed to decode product page: {e}")))?;

        Ok(ProductPage {
            products: body
                .products
                .into_iter()
                .map(|p| self.to_remote_product(p))
                .collect(),
            next_cursor,
        })
    }

    async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RemoteProduct>, CatalogError> {
        let params = vec![
            ("title", query.to_string()),
            ("limit", limit.to_string()),
        ];
        let response = self.get(&self.api_url("products.json"), &params).await?;

        let body: WireProductList = response
            .json()
            .await
            .map_err(|e| CatalogError::parse(format!("failed to decode search results: {e}")))?;

        Ok(body
            .products
            .into_iter()
            .take(limit)
            .map(|p| self.to_remote_product(p))
            .collect())
    }

    async fn get_product(&self, key: &str) -> Result<Option<RemoteProduct>, CatalogError> {
        let url = self.api_url(&format!("products/{key}.json"));
        match self.get(&url, &[]).await {
            Ok(response) => {
                let body: WireProductEnvelope = response
                    .json()
                    .await
                    .map_err(|e| CatalogError::parse(format!("failed to decode product: {e}")))?;
                Ok(Some(self.to_remote_product(body.product)))
            }
            Err(CatalogError::Unavailable { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn get_customer(&self, email: &str) -> Result<Option<RemoteCustomer>, CatalogError> {
        let params = vec![("query", format!("email:{email}"))];
        let response = self.get(&self.api_url("customers/search.json"), &params).await?;

        let body: WireCustomerList = response
            .json()
            .await
            .map_err(|e| CatalogError::parse(format!("failed to decode customers: {e}")))?;

        Ok(body.customers.into_iter().next().map(|c| RemoteCustomer {
            id: c.id.to_string(),
            email: c.email,
        }))
    }

    async fn create_draft_order(
        &self,
        customer: CustomerRef,
        line_items: Vec<LineItem>,
        note: &str,
    ) -> Result<DraftOrder, CatalogError> {
        let customer_value = match customer {
            CustomerRef::Id(id) => serde_json::json!({ "customer": { "id": id } }),
            CustomerRef::Email(email) => serde_json::json!({ "email": email }),
        };

        let mut draft = serde_json::json!({
            "line_items": line_items
                .iter()
                .map(|li| serde_json::json!({
                    "variant_id": li.variant_id,
                    "quantity": li.quantity,
                }))
                .collect::<Vec<_>>(),
            "note": note,
        });
        if let Some(obj) = draft.as_object_mut() {
            if let Some(extra) = customer_value.as_object() {
                obj.extend(extra.clone());
            }
        }

        let response = self
            .client
            .post(self.api_url("draft_orders.json"))
            .header("X-Shopify-Access-Token", self.config.access_token())
            .json(&serde_json::json!({ "draft_order": draft }))
            .send()
            .await
            .map_err(classify_send_error)?;

        let response = classify_status(response).await?;
        let body: WireDraftOrderEnvelope = response
            .json()
            .await
            .map_err(|e| CatalogError::parse(format!("failed to decode draft order: {e}")))?;

        Ok(DraftOrder {
            id: body.draft_order.id.to_string(),
            invoice_url: body.draft_order.invoice_url,
            total_price: body.draft_order.total_price,
        })
    }
}

/// Stand-in [`RemoteCatalogClient`] for deployments without Shopify
/// credentials. Every call reports [`CatalogError::Disabled`]; callers
/// degrade to the local catalog.
pub struct DisabledCatalogClient;

#[async_trait]
impl RemoteCatalogClient for DisabledCatalogClient {
    async fn list_products(
        &self,
        _page_size: u32,
        _after: Option<&str>,
    ) -> Result<ProductPage, CatalogError> {
        Err(CatalogError::Disabled)
    }

    async fn search_products(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<RemoteProduct>, CatalogError> {
        Err(CatalogError::Disabled)
    }

    async fn get_product(&self, _key: &str) -> Result<Option<RemoteProduct>, CatalogError> {
        Err(CatalogError::Disabled)
    }

    async fn get_customer(&self, _email: &str) -> Result<Option<RemoteCustomer>, CatalogError> {
        Err(CatalogError::Disabled)
    }

    async fn create_draft_order(
        &self,
        _customer: CustomerRef,
        _line_items: Vec<LineItem>,
        _note: &str,
    ) -> Result<DraftOrder, CatalogError> {
        Err(CatalogError::Disabled)
    }
}

fn classify_send_error(err: reqwest::Error) -> CatalogError {
    CatalogError::network(err.to_string())
}

async fn classify_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(CatalogError::AuthenticationFailed);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CatalogError::unavailable(status.as_u16(), body))
}

/// Extracts the next-page cursor from a Shopify `Link` header.
///
/// The header looks like:
/// `<https://x.myshopify.com/admin/api/2024-01/products.json?page_info=abc&limit=250>; rel="next"`
/// possibly alongside a `rel="previous"` entry.
fn parse_next_page_info(link_header: &str) -> Option<String> {
    for part in link_header.split(',') {
        let part = part.trim();
        if !part.ends_with("rel=\"next\"") {
            continue;
        }
        let url = part.strip_prefix('<')?.split('>').next()?;
        for param in url.split('?').nth(1)?.split('&') {
            if let Some(value) = param.strip_prefix("page_info=") {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Strips HTML tags and common entities from a product description,
/// truncating to 500 characters.
fn clean_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    let out = out.replace("&nbsp;", " ").replace("&quot;", "\"");
    let out = out.trim();
    out.chars().take(500).collect()
}

// ----- Shopify wire types -----

#[derive(Debug, Deserialize)]
struct WireProductList {
    products: Vec<WireProduct>,
}

#[derive(Debug, Deserialize)]
struct WireProductEnvelope {
    product: WireProduct,
}

#[derive(Debug, Deserialize)]
struct WireProduct {
    id: u64,
    title: String,
    body_html: Option<String>,
    product_type: Option<String>,
    tags: Option<String>,
    handle: String,
    image: Option<WireImage>,
    #[serde(default)]
    variants: Vec<WireVariant>,
}

#[derive(Debug, Deserialize)]
struct WireImage {
    src: String,
}

#[derive(Debug, Deserialize)]
struct WireVariant {
    id: u64,
    title: String,
    price: String,
    sku: Option<String>,
    #[serde(default)]
    inventory_quantity: i64,
}

#[derive(Debug, Deserialize)]
struct WireCustomerList {
    customers: Vec<WireCustomer>,
}

#[derive(Debug, Deserialize)]
struct WireCustomer {
    id: u64,
    email: String,
}

#[derive(Debug, Deserialize)]
struct WireDraftOrderEnvelope {
    draft_order: WireDraftOrder,
}

#[derive(Debug, Deserialize)]
struct WireDraftOrder {
    id: u64,
    invoice_url: Option<String>,
    total_price: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_next_cursor_from_link_header() {
        let header = r#"<https://x.myshopify.com/admin/api/2024-01/products.json?page_info=abc123&limit=250>; rel="next""#;
        assert_eq!(parse_next_page_info(header), Some("abc123".to_string()));
    }

    #[test]
    fn parses_next_among_previous_and_next() {
        let header = concat!(
            r#"<https://x.myshopify.com/admin/api/2024-01/products.json?page_info=prev1>; rel="previous", "#,
            r#"<https://x.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=next1>; rel="next""#,
        );
        assert_eq!(parse_next_page_info(header), Some("next1".to_string()));
    }

    #[test]
    fn no_next_link_means_no_cursor() {
        let header = r#"<https://x.myshopify.com/admin/api/2024-01/products.json?page_info=prev1>; rel="previous""#;
        assert_eq!(parse_next_page_info(header), None);
    }

    #[test]
    fn clean_html_strips_tags_and_entities() {
        let html = "<p>Soft&nbsp;cotton <b>dress</b> with &quot;floral&quot; print</p>";
        assert_eq!(clean_html(html), "Soft cotton dress with \"floral\" print");
    }

    #[test]
    fn clean_html_truncates_long_descriptions() {
        let html = "x".repeat(900);
        assert_eq!(clean_html(&html).len(), 500);
    }

    #[test]
    fn wire_product_converts_with_lead_variant() {
        let config = ShopifyClientConfig::new("shop.myshopify.com", "shpat_x");
        let client = ShopifyClient::new(config).unwrap();

        let wire: WireProduct = serde_json::from_str(
            r#"{
                "id": 42,
                "title": "Floral Dress",
                "body_html": "<p>Nice</p>",
                "product_type": "Dresses",
                "tags": "summer, floral",
                "handle": "floral-dress",
                "image": {"src": "https://cdn/img.jpg"},
                "variants": [
                    {"id": 1, "title": "S", "price": "1499.00", "sku": "FD-S", "inventory_quantity": 3},
                    {"id": 2, "title": "M", "price": "1499.00", "sku": "", "inventory_quantity": 0}
                ]
            }"#,
        )
        .unwrap();

        let product = client.to_remote_product(wire);
        assert_eq!(product.key, "42");
        assert_eq!(product.price, 1499.0);
        assert_eq!(product.quantity, 3);
        assert_eq!(product.tags, vec!["summer", "floral"]);
        assert_eq!(
            product.url.as_deref(),
            Some("https://shop.myshopify.com/products/floral-dress")
        );
        assert_eq!(product.variants.len(), 2);
        assert!(product.variants[0].available);
        assert!(!product.variants[1].available);
        assert_eq!(product.variants[1].sku, None);
    }

    #[test]
    fn wire_product_without_variants_defaults() {
        let config = ShopifyClientConfig::new("shop.myshopify.com", "shpat_x");
        let client = ShopifyClient::new(config).unwrap();

        let wire: WireProduct = serde_json::from_str(
            r#"{"id": 7, "title": "Gift Card", "handle": "gift-card"}"#,
        )
        .unwrap();

        let product = client.to_remote_product(wire);
        assert_eq!(product.price, 0.0);
        assert_eq!(product.quantity, 0);
        assert!(product.tags.is_empty());
        assert_eq!(product.description, "");
    }
}
