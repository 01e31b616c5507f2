//! In-memory store adapters.
//!
//! Used by tests and by deployments running without a database. They honor
//! the same port contracts as the Postgres adapters.

mod conversation_store;
mod product_store;

pub use conversation_store::InMemoryConversationStore;
pub use product_store::InMemoryProductStore;
