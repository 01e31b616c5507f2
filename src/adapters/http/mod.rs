//! HTTP adapters - REST API for the chat assistant.

mod dto;
mod handlers;
mod routes;

pub use handlers::ChatAppState;
pub use routes::{chat_router, chat_routes};
