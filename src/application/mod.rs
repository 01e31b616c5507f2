//! Application layer: the orchestration engines composed from ports.

mod gateway;
mod orchestrator;
mod search;
mod sync;

pub use gateway::{AiGateway, GatewayReply};
pub use orchestrator::{ConversationOrchestrator, ProcessedReply, ProcessingError};
pub use search::{tokenize, ProductSearchService};
pub use sync::{record_from_remote, CatalogSyncEngine, SyncReport, SyncState, SyncStatus};
