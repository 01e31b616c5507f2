//! In-memory product store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::catalog::ProductRecord;
use crate::domain::foundation::StoreError;
use crate::ports::{ProductStore, UpsertOutcome};

/// A [`ProductStore`] backed by a `HashMap` keyed on external key.
pub struct InMemoryProductStore {
    records: RwLock<HashMap<String, ProductRecord>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn upsert_by_external_key(
        &self,
        record: &ProductRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let key = record
            .external_key
            .clone()
            .ok_or_else(|| StoreError::corrupt("upsert requires an external key"))?;

        let mut records = self.records.write().await;
        match records.get(&key) {
            Some(existing) if existing.same_content(record) => Ok(UpsertOutcome::Unchanged),
            Some(existing) => {
                let mut updated = record.clone();
                updated.id = existing.id;
                records.insert(key, updated);
                Ok(UpsertOutcome::Updated)
            }
            None => {
                let mut created = record.clone();
                created.id = Some(Uuid::new_v4());
                records.insert(key, created);
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn find_by_external_key(
        &self,
        external_key: &str,
    ) -> Result<Option<ProductRecord>, StoreError> {
        Ok(self.records.read().await.get(external_key).cloned())
    }

    async fn search_keywords(
        &self,
        tokens: &[String],
        limit: usize,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let records = self.records.read().await;
        let mut hits: Vec<ProductRecord> = records
            .values()
            .filter(|p| p.in_stock && p.matches_any_token(tokens))
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synced(key: &str, name: &str, price: f64) -> ProductRecord {
        let mut p = ProductRecord::manual(name, "Dresses", price);
        p.external_key = Some(key.to_string());
        p
    }

    #[tokio::test]
    async fn upsert_without_key_is_rejected() {
        let store = InMemoryProductStore::new();
        let record = ProductRecord::manual("Dress", "Dresses", 100.0);
        let err = store.upsert_by_external_key(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[tokio::test]
    async fn create_update_unchanged_sequence() {
        let store = InMemoryProductStore::new();
        let mut record = synced("k1", "Dress", 100.0);

        let outcome = store.upsert_by_external_key(&record).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
        let id = store
            .find_by_external_key("k1")
            .await
            .unwrap()
            .unwrap()
            .id
            .unwrap();

        record.price = 120.0;
        let outcome = store.upsert_by_external_key(&record).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        let outcome = store.upsert_by_external_key(&record).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Unchanged);

        // identity is stable across updates
        let found = store.find_by_external_key("k1").await.unwrap().unwrap();
        assert_eq!(found.id.unwrap(), id);
        assert_eq!(found.price, 120.0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn search_filters_stock_and_orders_by_rating() {
        let store = InMemoryProductStore::new();

        let mut low = synced("k1", "Summer Dress", 100.0);
        low.rating = 3.0;
        let mut high = synced("k2", "Party Dress", 150.0);
        high.rating = 4.9;
        let mut out = synced("k3", "Winter Dress", 200.0);
        out.in_stock = false;

        for p in [&low, &high, &out] {
            store.upsert_by_external_key(p).await.unwrap();
        }

        let hits = store
            .search_keywords(&["dress".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Party Dress");
        assert_eq!(hits[1].name, "Summer Dress");
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let store = InMemoryProductStore::new();
        for i in 0..5 {
            let p = synced(&format!("k{i}"), &format!("Dress {i}"), 100.0);
            store.upsert_by_external_key(&p).await.unwrap();
        }

        let hits = store
            .search_keywords(&["dress".to_string()], 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }
}
