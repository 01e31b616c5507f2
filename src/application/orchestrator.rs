//! Conversation orchestrator: the one-message processing transaction.
//!
//! Loads (or creates) the session record, classifies intent, advances the
//! stage, gathers grounding data, calls the selected vendor, and persists
//! the updated record. Exactly one write happens per successfully processed
//! message; a vendor failure persists nothing.
//!
//! Concurrent messages on one session are serialized through a per-session
//! keyed lock so a racing turn cannot silently overwrite another.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use super::gateway::AiGateway;
use super::search::ProductSearchService;
use crate::domain::catalog::ProductRecord;
use crate::domain::conversation::{
    next_stage, stage_prompt, ConversationRecord, IntentLevel, MessageRole, Stage,
};
use crate::domain::foundation::StoreError;
use crate::ports::{
    AiError, ChatTurn, ConversationStore, IntentDetector, KnowledgeAggregator, KnowledgeSource,
};

/// Turns of history included in the model prompt.
const HISTORY_WINDOW: usize = 6;
/// Products attached to a reply.
const MAX_PRODUCTS: usize = 3;
/// Grounding sources reported back to the caller.
const MAX_SOURCES: usize = 3;

/// Errors that abort message processing.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// The language-model vendor failed; the turn was not persisted.
    #[error("vendor error: {0}")]
    Vendor(#[from] AiError),

    /// The conversation store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// The outcome of one processed message.
#[derive(Debug, Clone)]
pub struct ProcessedReply {
    pub reply: String,
    pub stage: Stage,
    pub intent: IntentLevel,
    /// Matched products, at most three, in search order.
    pub products: Vec<ProductRecord>,
    /// Grounding sources used, at most three.
    pub sources: Vec<KnowledgeSource>,
}

/// Composes stage transitions, grounding lookup, prompt assembly, vendor
/// invocation, and persistence into one message-processing transaction.
pub struct ConversationOrchestrator {
    conversations: Arc<dyn ConversationStore>,
    intent: Arc<dyn IntentDetector>,
    knowledge: Arc<dyn KnowledgeAggregator>,
    search: Arc<ProductSearchService>,
    gateway: Arc<AiGateway>,
    session_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationOrchestrator {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        intent: Arc<dyn IntentDetector>,
        knowledge: Arc<dyn KnowledgeAggregator>,
        search: Arc<ProductSearchService>,
        gateway: Arc<AiGateway>,
    ) -> Self {
        Self {
            conversations,
            intent,
            knowledge,
            search,
            gateway,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the lock guarding a session, creating it on first use.
    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.session_locks.lock().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Processes one user message for a session.
    #[instrument(skip(self, text), fields(session = %session_id))]
    pub async fn process_message(
        &self,
        session_id: &str,
        text: &str,
        vendor: Option<&str>,
    ) -> Result<ProcessedReply, ProcessingError> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        // Load or create, then append the user turn.
        let mut record = match self.conversations.find(session_id).await? {
            Some(record) => record,
            None => ConversationRecord::new(session_id),
        };
        record.push_user(text);

        // Intent and preference extraction (external, infallible).
        let signal = self.intent.detect(text, &record).await;
        record.apply_intent(signal.intent, signal.preferences);

        // Stage transition.
        let stage = next_stage(record.message_count(), record.intent_level, text);
        record.current_stage = stage;

        // Grounding: matched products plus policy/FAQ text.
        let products = self.search.search(text, MAX_PRODUCTS).await;
        let knowledge = self.knowledge.search(text).await;
        let grounding = self.knowledge.format_for_ai(&knowledge, text);

        let system_prompt = self.build_prompt(&record, stage, &grounding);
        let history = Self::history_turns(&record);

        // A vendor failure propagates before anything is persisted.
        let reply = self.gateway.generate(&system_prompt, &history, vendor).await?;

        let sources: Vec<KnowledgeSource> =
            knowledge.sources.into_iter().take(MAX_SOURCES).collect();
        let product_refs = products.iter().map(ProductRecord::reference_key).collect();
        record.push_assistant(&reply.content, product_refs, sources.len() as u32);
        record.touch();
        self.conversations.upsert(&record).await?;

        info!(
            stage = %stage,
            intent = %record.intent_level,
            vendor = %reply.vendor_used,
            tokens = reply.tokens_used,
            products = products.len(),
            "message processed"
        );

        Ok(ProcessedReply {
            reply: reply.content,
            stage,
            intent: record.intent_level,
            products,
            sources,
        })
    }

    /// Assembles the system prompt: stage template, profile summary,
    /// intent/stage footer, then grounding data.
    fn build_prompt(&self, record: &ConversationRecord, stage: Stage, grounding: &str) -> String {
        let mut prompt = stage_prompt(stage);
        prompt.push_str("\n\n");

        if let Some(summary) = record.user_profile.summary() {
            prompt.push_str(&summary);
        }

        prompt.push_str(&format!("\nIntent level: {}\n", record.intent_level));
        prompt.push_str(&format!("Current stage: {stage}\n"));
        prompt.push_str("\nIMPORTANT: Keep response SHORT, ONE emoji max, ONE question max!");

        if !grounding.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(grounding);
        }

        prompt
    }

    /// The trimmed history window as vendor chat turns, latest user
    /// message included.
    fn history_turns(record: &ConversationRecord) -> Vec<ChatTurn> {
        record
            .recent_messages(HISTORY_WINDOW)
            .iter()
            .map(|m| match m.role {
                MessageRole::User => ChatTurn::user(&m.content),
                MessageRole::Assistant => ChatTurn::assistant(&m.content),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockProvider;
    use crate::adapters::memory::{InMemoryConversationStore, InMemoryProductStore};
    use crate::application::sync::SyncState;
    use crate::ports::{IntentSignal, KnowledgeResults};
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct FixedIntent {
        signal: IntentSignal,
    }

    #[async_trait]
    impl IntentDetector for FixedIntent {
        async fn detect(&self, _text: &str, _conversation: &ConversationRecord) -> IntentSignal {
            self.signal.clone()
        }
    }

    struct EmptyKnowledge;

    #[async_trait]
    impl KnowledgeAggregator for EmptyKnowledge {
        async fn search(&self, _query: &str) -> KnowledgeResults {
            KnowledgeResults::default()
        }

        fn format_for_ai(&self, _results: &KnowledgeResults, _query: &str) -> String {
            String::new()
        }
    }

    struct DisabledRemote;

    #[async_trait]
    impl crate::ports::RemoteCatalogClient for DisabledRemote {
        async fn list_products(
            &self,
            _page_size: u32,
            _after: Option<&str>,
        ) -> Result<crate::ports::ProductPage, crate::ports::CatalogError> {
            Err(crate::ports::CatalogError::Disabled)
        }

        async fn search_products(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<crate::ports::RemoteProduct>, crate::ports::CatalogError> {
            Err(crate::ports::CatalogError::Disabled)
        }

        async fn get_product(
            &self,
            _key: &str,
        ) -> Result<Option<crate::ports::RemoteProduct>, crate::ports::CatalogError> {
            Ok(None)
        }

        async fn get_customer(
            &self,
            _email: &str,
        ) -> Result<Option<crate::ports::RemoteCustomer>, crate::ports::CatalogError> {
            Ok(None)
        }

        async fn create_draft_order(
            &self,
            _customer: crate::ports::CustomerRef,
            _line_items: Vec<crate::ports::LineItem>,
            _note: &str,
        ) -> Result<crate::ports::DraftOrder, crate::ports::CatalogError> {
            Err(crate::ports::CatalogError::Disabled)
        }
    }

    fn orchestrator_with(
        provider: Arc<MockProvider>,
        intent: IntentSignal,
    ) -> (ConversationOrchestrator, Arc<InMemoryConversationStore>) {
        let conversations = Arc::new(InMemoryConversationStore::new());
        let state = Arc::new(SyncState::new(false));
        let search = Arc::new(ProductSearchService::new(
            Arc::new(DisabledRemote),
            Arc::new(InMemoryProductStore::new()),
            state,
        ));
        let gateway = Arc::new(AiGateway::new("mock").register(provider));
        let orchestrator = ConversationOrchestrator::new(
            conversations.clone(),
            Arc::new(FixedIntent { signal: intent }),
            Arc::new(EmptyKnowledge),
            search,
            gateway,
        );
        (orchestrator, conversations)
    }

    #[tokio::test]
    async fn first_message_is_hook_with_no_products() {
        let (orchestrator, store) =
            orchestrator_with(Arc::new(MockProvider::replying("welcome!")), IntentSignal::default());

        let result = orchestrator
            .process_message("sess-1", "Hi", None)
            .await
            .unwrap();

        assert_eq!(result.stage, Stage::Hook);
        assert!(result.products.is_empty());
        assert_eq!(result.reply, "welcome!");

        let record = store.find("sess-1").await.unwrap().unwrap();
        assert_eq!(record.message_count(), 2); // user + assistant
        assert_eq!(record.current_stage, Stage::Hook);
    }

    #[tokio::test]
    async fn high_intent_session_skips_to_recommend() {
        let (orchestrator, store) = orchestrator_with(
            Arc::new(MockProvider::replying("here you go")),
            IntentSignal {
                intent: IntentLevel::High,
                preferences: None,
            },
        );

        // Build up 5 prior messages so the hook rule no longer applies.
        let mut record = ConversationRecord::new("sess-2");
        for i in 0..5 {
            record.push_user(format!("msg {i}"));
        }
        store.upsert(&record).await.unwrap();

        let result = orchestrator
            .process_message("sess-2", "show me dresses", None)
            .await
            .unwrap();

        assert_eq!(result.stage, Stage::Recommend);
        assert_eq!(result.intent, IntentLevel::High);
    }

    #[tokio::test]
    async fn policy_question_routes_to_support() {
        let (orchestrator, store) = orchestrator_with(
            Arc::new(MockProvider::replying("our policy is...")),
            IntentSignal::default(),
        );

        let mut record = ConversationRecord::new("sess-3");
        for i in 0..8 {
            record.push_user(format!("msg {i}"));
        }
        store.upsert(&record).await.unwrap();

        let result = orchestrator
            .process_message("sess-3", "what's your return policy?", None)
            .await
            .unwrap();

        assert_eq!(result.stage, Stage::Support);
    }

    #[tokio::test]
    async fn vendor_failure_persists_nothing() {
        let (orchestrator, store) =
            orchestrator_with(Arc::new(MockProvider::failing()), IntentSignal::default());

        let err = orchestrator
            .process_message("sess-4", "Hi", None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessingError::Vendor(_)));
        assert!(store.find("sess-4").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn preferences_merge_across_turns() {
        let mut prefs = BTreeMap::new();
        prefs.insert("budget".to_string(), "under 2000".to_string());
        let (orchestrator, store) = orchestrator_with(
            Arc::new(MockProvider::replying("noted")),
            IntentSignal {
                intent: IntentLevel::Medium,
                preferences: Some(prefs),
            },
        );

        orchestrator.process_message("sess-5", "hi", None).await.unwrap();

        let record = store.find("sess-5").await.unwrap().unwrap();
        assert_eq!(record.user_profile.get("budget"), Some("under 2000"));
    }

    #[tokio::test]
    async fn history_sent_to_vendor_is_trimmed_to_window() {
        let provider = Arc::new(MockProvider::replying("ok"));
        let (orchestrator, store) =
            orchestrator_with(provider.clone(), IntentSignal::default());

        let mut record = ConversationRecord::new("sess-6");
        for i in 0..12 {
            record.push_user(format!("msg {i}"));
        }
        store.upsert(&record).await.unwrap();

        orchestrator
            .process_message("sess-6", "latest", None)
            .await
            .unwrap();

        // system turn + HISTORY_WINDOW history turns
        let turns = provider.last_turns();
        assert_eq!(turns.len(), 1 + HISTORY_WINDOW);
        assert_eq!(turns.last().unwrap().content, "latest");
    }

    #[tokio::test]
    async fn prompt_contains_stage_profile_and_grounding_sections() {
        let mut record = ConversationRecord::new("s");
        record.user_profile.set("budget", "under 3000");
        record.intent_level = IntentLevel::Medium;

        let (orchestrator, _) = orchestrator_with(
            Arc::new(MockProvider::replying("x")),
            IntentSignal::default(),
        );
        let prompt = orchestrator.build_prompt(&record, Stage::Engage, "REAL DATA BLOCK");

        assert!(prompt.contains("CURRENT STAGE: Engage"));
        assert!(prompt.contains("- Budget: under 3000"));
        assert!(prompt.contains("Intent level: medium"));
        assert!(prompt.contains("REAL DATA BLOCK"));
    }
}
