//! Store-backed knowledge aggregator.
//!
//! Grounds the model on the local product store plus a static store-policy
//! table. Products are fetched by keyword; a policy entry is included when
//! one of its keywords appears in the query.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::application::tokenize;
use crate::ports::{KnowledgeAggregator, KnowledgeResults, KnowledgeSource, ProductStore};

const MAX_GROUNDING_PRODUCTS: usize = 5;

/// A store policy the assistant can answer questions from.
struct PolicyEntry {
    title: &'static str,
    body: &'static str,
    keywords: &'static [&'static str],
}

const POLICIES: &[PolicyEntry] = &[
    PolicyEntry {
        title: "Shipping & Delivery",
        body: "Free shipping on orders above ₹999. Delivery takes 2-4 business days across India.",
        keywords: &["shipping", "delivery", "how long", "when will", "ship"],
    },
    PolicyEntry {
        title: "Returns & Exchanges",
        body: "7-day easy returns, no questions asked. Size exchanges are available on all items.",
        keywords: &["return", "exchange", "refund", "size chart"],
    },
    PolicyEntry {
        title: "Payment Options",
        body: "Cash on Delivery (COD) is available on all orders, free of charge. Online payments go through a secure gateway.",
        keywords: &["payment", "cod", "cash on delivery", "pay"],
    },
    PolicyEntry {
        title: "Order Tracking",
        body: "Orders can be tracked anytime from the website using the order number.",
        keywords: &["track", "order status", "where is my order"],
    },
];

/// Default [`KnowledgeAggregator`] over the product store and policy table.
pub struct StoreKnowledgeAggregator {
    products: Arc<dyn ProductStore>,
}

impl StoreKnowledgeAggregator {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl KnowledgeAggregator for StoreKnowledgeAggregator {
    async fn search(&self, query: &str) -> KnowledgeResults {
        let mut results = KnowledgeResults::default();
        let lower = query.to_lowercase();

        let tokens = tokenize(query);
        if !tokens.is_empty() {
            match self
                .products
                .search_keywords(&tokens, MAX_GROUNDING_PRODUCTS)
                .await
            {
                Ok(products) => {
                    for product in &products {
                        results.sources.push(KnowledgeSource::product(&product.name));
                    }
                    results.products = products;
                }
                Err(err) => {
                    debug!(error = %err, "product grounding lookup failed");
                }
            }
        }

        for policy in POLICIES {
            if policy.keywords.iter().any(|k| lower.contains(k)) {
                results.sources.push(KnowledgeSource::policy(policy.title));
            }
        }

        results
    }

    fn format_for_ai(&self, results: &KnowledgeResults, query: &str) -> String {
        if results.products.is_empty() && results.sources.is_empty() {
            return String::new();
        }

        let mut block = format!("\n\nREAL STORE DATA for \"{query}\":\n");

        if !results.products.is_empty() {
            block.push_str("\nMatching products (recommend only from this list):\n");
            for product in &results.products {
                let stock = if product.in_stock {
                    "in stock"
                } else {
                    "out of stock"
                };
                block.push_str(&format!(
                    "- {} | ₹{:.0} | {} | {}\n",
                    product.name, product.price, product.category, stock
                ));
            }
        }

        let policy_titles: Vec<&str> = results
            .sources
            .iter()
            .filter(|s| s.kind == "policy")
            .map(|s| s.title.as_str())
            .collect();
        if !policy_titles.is_empty() {
            block.push_str("\nRelevant store policies:\n");
            for policy in POLICIES {
                if policy_titles.contains(&policy.title) {
                    block.push_str(&format!("- {}: {}\n", policy.title, policy.body));
                }
            }
        }

        block.push_str("\nUse only this data when stating facts about products or policies.");
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProductStore;
    use crate::domain::catalog::ProductRecord;

    async fn aggregator_with_dress() -> StoreKnowledgeAggregator {
        let store = Arc::new(InMemoryProductStore::new());
        let mut dress = ProductRecord::manual("Floral Midi Dress", "Dresses", 1499.0);
        dress.external_key = Some("k1".to_string());
        store.upsert_by_external_key(&dress).await.unwrap();
        StoreKnowledgeAggregator::new(store)
    }

    #[tokio::test]
    async fn product_query_grounds_on_store() {
        let aggregator = aggregator_with_dress().await;
        let results = aggregator.search("show me a floral dress").await;

        assert_eq!(results.products.len(), 1);
        assert_eq!(results.sources[0].kind, "product");
        assert_eq!(results.sources[0].title, "Floral Midi Dress");
    }

    #[tokio::test]
    async fn policy_query_adds_policy_source() {
        let aggregator = aggregator_with_dress().await;
        let results = aggregator.search("what is your return policy?").await;

        assert!(results
            .sources
            .iter()
            .any(|s| s.kind == "policy" && s.title == "Returns & Exchanges"));
    }

    #[tokio::test]
    async fn format_includes_products_and_policies() {
        let aggregator = aggregator_with_dress().await;
        let results = aggregator.search("return a dress").await;
        let block = aggregator.format_for_ai(&results, "return a dress");

        assert!(block.contains("Floral Midi Dress"));
        assert!(block.contains("7-day easy returns"));
        assert!(block.contains("REAL STORE DATA"));
    }

    #[tokio::test]
    async fn empty_results_format_to_empty_string() {
        let aggregator = aggregator_with_dress().await;
        let results = KnowledgeResults::default();
        assert_eq!(aggregator.format_for_ai(&results, "hi"), "");
    }
}
