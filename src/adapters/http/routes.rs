//! Axum routes for chat and sync endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_conversation, send_message, sync_status, ChatAppState};

/// Creates routes for chat endpoints.
///
/// REST Endpoints:
/// - POST /api/chat/message - Process one user message
/// - GET /api/chat/conversation/:session_id - Fetch a stored conversation
/// - GET /api/sync/status - Current catalog sync state
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new()
        .route("/chat/message", post(send_message))
        .route("/chat/conversation/:session_id", get(get_conversation))
        .route("/sync/status", get(sync_status))
}

/// Combined router with all chat routes under /api.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().nest("/api", chat_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_routes_creates_valid_router() {
        let _routes = chat_routes();
    }

    #[test]
    fn chat_router_creates_combined_router() {
        let _router = chat_router();
    }
}
