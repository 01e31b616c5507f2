//! Ports: the trait seams between the application core and its adapters.

mod ai_provider;
mod conversation_store;
mod intent_detector;
mod knowledge;
mod product_store;
mod remote_catalog;

pub use ai_provider::{AiError, AiProvider, ChatTurn, Completion, TurnRole};
pub use conversation_store::ConversationStore;
pub use intent_detector::{IntentDetector, IntentSignal};
pub use knowledge::{KnowledgeAggregator, KnowledgeResults, KnowledgeSource};
pub use product_store::{ProductStore, UpsertOutcome};
pub use remote_catalog::{
    CatalogError, CustomerRef, DraftOrder, LineItem, ProductPage, RemoteCatalogClient,
    RemoteCustomer, RemoteProduct, RemoteVariant,
};
