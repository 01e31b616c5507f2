//! Product store port.

use async_trait::async_trait;

use crate::domain::catalog::ProductRecord;
use crate::domain::foundation::StoreError;

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was inserted.
    Created,
    /// An existing record was altered.
    Updated,
    /// The record already matched; nothing was written.
    Unchanged,
}

impl UpsertOutcome {
    /// True when the upsert created or altered a record.
    pub fn changed(&self) -> bool {
        !matches!(self, UpsertOutcome::Unchanged)
    }
}

/// Persistence port for catalog products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Updates the record matching `external_key` in place, or inserts a
    /// new one. The record must carry an external key.
    async fn upsert_by_external_key(
        &self,
        record: &ProductRecord,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Looks up a record by its external key.
    async fn find_by_external_key(
        &self,
        external_key: &str,
    ) -> Result<Option<ProductRecord>, StoreError>;

    /// Keyword search over in-stock products: case-insensitive substring on
    /// name/description/category or exact tag match, ordered by rating
    /// descending, limited.
    async fn search_keywords(
        &self,
        tokens: &[String],
        limit: usize,
    ) -> Result<Vec<ProductRecord>, StoreError>;

    /// Total number of stored products.
    async fn count(&self) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ProductStore) {}
    }

    #[test]
    fn outcome_changed_flags() {
        assert!(UpsertOutcome::Created.changed());
        assert!(UpsertOutcome::Updated.changed());
        assert!(!UpsertOutcome::Unchanged.changed());
    }
}
