//! Two-tier product search: live platform first, local catalog fallback.
//!
//! Strictly remote-first: when remote search is enabled and returns at
//! least one hit, those results are returned in platform order. Otherwise
//! (disabled, remote failure, or zero remote hits) the local keyword search
//! answers. The tiers are never merged.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use super::sync::{record_from_remote, SyncState};
use crate::domain::catalog::ProductRecord;
use crate::ports::{ProductStore, RemoteCatalogClient};

/// Splits a query into search tokens, dropping words of length ≤ 2.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .map(|w| w.to_lowercase())
        .collect()
}

/// Remote-first product search with local fallback.
pub struct ProductSearchService {
    remote: Arc<dyn RemoteCatalogClient>,
    store: Arc<dyn ProductStore>,
    state: Arc<SyncState>,
}

impl ProductSearchService {
    pub fn new(
        remote: Arc<dyn RemoteCatalogClient>,
        store: Arc<dyn ProductStore>,
        state: Arc<SyncState>,
    ) -> Self {
        Self {
            remote,
            store,
            state,
        }
    }

    /// Searches for products matching `query`, returning up to `limit`.
    ///
    /// Infallible by design: both tiers failing yields an empty list, and
    /// the conversation proceeds without product grounding.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<ProductRecord> {
        if self.state.is_enabled() {
            match self.remote.search_products(query, limit).await {
                Ok(products) if !products.is_empty() => {
                    debug!(count = products.len(), "remote search hit");
                    let now = Utc::now();
                    return products
                        .iter()
                        .take(limit)
                        .map(|p| record_from_remote(p, now))
                        .collect();
                }
                Ok(_) => {
                    debug!("remote search returned nothing, trying local catalog");
                }
                Err(err) => {
                    warn!(error = %err, "remote search failed, trying local catalog");
                }
            }
        }

        self.search_local(query, limit).await
    }

    /// Local keyword search over the synced catalog.
    async fn search_local(&self, query: &str, limit: usize) -> Vec<ProductRecord> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        match self.store.search_keywords(&tokens, limit).await {
            Ok(products) => {
                debug!(count = products.len(), "local search hit");
                products
            }
            Err(err) => {
                warn!(error = %err, "local search failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProductStore;
    use crate::ports::{
        CatalogError, CustomerRef, DraftOrder, LineItem, ProductPage, RemoteCustomer,
        RemoteProduct, UpsertOutcome,
    };
    use async_trait::async_trait;

    struct StubRemote {
        result: Result<Vec<RemoteProduct>, CatalogError>,
    }

    #[async_trait]
    impl RemoteCatalogClient for StubRemote {
        async fn list_products(
            &self,
            _page_size: u32,
            _after: Option<&str>,
        ) -> Result<ProductPage, CatalogError> {
            Ok(ProductPage::default())
        }

        async fn search_products(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<RemoteProduct>, CatalogError> {
            self.result.clone()
        }

        async fn get_product(&self, _key: &str) -> Result<Option<RemoteProduct>, CatalogError> {
            Ok(None)
        }

        async fn get_customer(&self, _email: &str) -> Result<Option<RemoteCustomer>, CatalogError> {
            Ok(None)
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

    fn remote_hit(key: &str) -> RemoteProduct {
        RemoteProduct {
            key: key.to_string(),
            name: "Remote Dress".to_string(),
            description: String::new(),
            price: 1200.0,
            category: "Dresses".to_string(),
            tags: Vec::new(),
            image: None,
            url: None,
            quantity: 1,
            variants: Vec::new(),
        }
    }

    async fn seeded_store() -> Arc<InMemoryProductStore> {
        let store = Arc::new(InMemoryProductStore::new());
        let mut dress = ProductRecord::manual("Summer Dress", "Dresses", 999.0);
        dress.external_key = Some("local-1".to_string());
        dress.rating = 4.0;
        let mut top = ProductRecord::manual("Linen Top", "Tops", 599.0);
        top.external_key = Some("local-2".to_string());
        top.description = "A dress-season staple".to_string();
        top.rating = 4.8;
        store.upsert_by_external_key(&dress).await.unwrap();
        store.upsert_by_external_key(&top).await.unwrap();
        store
    }

    #[tokio::test]
    async fn remote_results_win_when_enabled() {
        let service = ProductSearchService::new(
            Arc::new(StubRemote {
                result: Ok(vec![remote_hit("r1")]),
            }),
            seeded_store().await,
            Arc::new(SyncState::new(true)),
        );

        let results = service.search("dress", 5).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].external_key.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn disabled_remote_uses_local_only() {
        let service = ProductSearchService::new(
            Arc::new(StubRemote {
                result: Ok(vec![remote_hit("r1")]),
            }),
            seeded_store().await,
            Arc::new(SyncState::new(false)),
        );

        let results = service.search("dress", 5).await;
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|p| p.external_key.as_deref().unwrap().starts_with("local")));
    }

    #[tokio::test]
    async fn remote_failure_falls_back_to_local() {
        let service = ProductSearchService::new(
            Arc::new(StubRemote {
                result: Err(CatalogError::network("boom")),
            }),
            seeded_store().await,
            Arc::new(SyncState::new(true)),
        );

        let results = service.search("dress", 5).await;
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|p| p.external_key.as_deref().unwrap().starts_with("local")));
    }

    #[tokio::test]
    async fn local_results_are_rating_ordered() {
        let service = ProductSearchService::new(
            Arc::new(StubRemote { result: Ok(vec![]) }),
            seeded_store().await,
            Arc::new(SyncState::new(true)),
        );

        let results = service.search("dress", 5).await;
        // Both match "dress" (name vs description); higher rating first.
        assert_eq!(results.len(), 2);
        assert!(results[0].rating >= results[1].rating);
        assert_eq!(results[0].name, "Linen Top");
    }

    #[tokio::test]
    async fn short_tokens_are_dropped() {
        assert_eq!(tokenize("a red dress"), vec!["red", "dress"]);
        assert!(tokenize("a an of").is_empty());
    }

    #[tokio::test]
    async fn out_of_stock_products_are_excluded_locally() {
        let store = Arc::new(InMemoryProductStore::new());
        let mut gone = ProductRecord::manual("Sold Out Dress", "Dresses", 999.0);
        gone.external_key = Some("gone".to_string());
        gone.in_stock = false;
        assert_eq!(
            store.upsert_by_external_key(&gone).await.unwrap(),
            UpsertOutcome::Created
        );

        let service = ProductSearchService::new(
            Arc::new(StubRemote { result: Ok(vec![]) }),
            store,
            Arc::new(SyncState::new(false)),
        );
        assert!(service.search("dress", 5).await.is_empty());
    }
}
