//! In-memory conversation store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationRecord;
use crate::domain::foundation::StoreError;
use crate::ports::ConversationStore;

/// A [`ConversationStore`] backed by a `HashMap`.
pub struct InMemoryConversationStore {
    records: RwLock<HashMap<String, ConversationRecord>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored conversations.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find(&self, session_id: &str) -> Result<Option<ConversationRecord>, StoreError> {
        Ok(self.records.read().await.get(session_id).cloned())
    }

    async fn upsert(&self, record: &ConversationRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.session_id.clone(), record.clone());
        Ok(())
    }
}
