//! Conversation store port.
//!
//! The orchestrator loads the full record, mutates it in memory, and writes
//! it back exactly once per processed message. Per-session serialization is
//! the orchestrator's job, not the store's.

use async_trait::async_trait;

use crate::domain::conversation::ConversationRecord;
use crate::domain::foundation::StoreError;

/// Persistence port for conversation records.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Finds the record for a session. `None` when the session has never
    /// sent a message.
    async fn find(&self, session_id: &str) -> Result<Option<ConversationRecord>, StoreError>;

    /// Inserts or replaces the full record for its session id.
    async fn upsert(&self, record: &ConversationRecord) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ConversationStore) {}
    }
}
