//! PostgreSQL store adapters.
//!
//! - `PostgresConversationStore` persists conversation records with
//!   messages and profile as jsonb.
//! - `PostgresProductStore` persists the synced product catalog keyed
//!   on `external_key`.

mod conversation_store;
mod product_store;

pub use conversation_store::PostgresConversationStore;
pub use product_store::PostgresProductStore;
