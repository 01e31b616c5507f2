//! HTTP handlers for chat and sync endpoints.
//!
//! These handlers connect Axum routes to the application layer.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{ConversationOrchestrator, ProcessingError, SyncState};
use crate::ports::ConversationStore;

use super::dto::{ConversationView, ErrorResponse, MessageReplyView, SendMessageRequest};

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
    pub conversations: Arc<dyn ConversationStore>,
    pub sync_state: Arc<SyncState>,
}

impl ChatAppState {
    /// Creates a new ChatAppState.
    pub fn new(
        orchestrator: Arc<ConversationOrchestrator>,
        conversations: Arc<dyn ConversationStore>,
        sync_state: Arc<SyncState>,
    ) -> Self {
        Self {
            orchestrator,
            conversations,
            sync_state,
        }
    }
}

/// POST /api/chat/message - Process one user message.
///
/// # Errors
/// - 400 Bad Request: Empty session id or message
/// - 502 Bad Gateway: The language-model vendor failed
/// - 500 Internal Server Error: Persistence failed
pub async fn send_message(
    State(state): State<ChatAppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    if request.session_id.trim().is_empty() {
        return Err(ChatApiError::BadRequest("sessionId is required".to_string()));
    }
    if request.message.trim().is_empty() {
        return Err(ChatApiError::BadRequest("message is required".to_string()));
    }

    let reply = state
        .orchestrator
        .process_message(
            &request.session_id,
            &request.message,
            request.model.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(MessageReplyView::from(reply))))
}

/// GET /api/chat/conversation/{session_id} - Fetch a stored conversation.
///
/// # Errors
/// - 404 Not Found: The session has never sent a message
/// - 500 Internal Server Error: Persistence failed
pub async fn get_conversation(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let record = state
        .conversations
        .find(&session_id)
        .await
        .map_err(|e| ChatApiError::Internal(e.to_string()))?
        .ok_or(ChatApiError::NotFound(session_id))?;

    Ok((StatusCode::OK, Json(ConversationView::from(&record))))
}

/// GET /api/sync/status - Current catalog sync state.
pub async fn sync_status(State(state): State<ChatAppState>) -> impl IntoResponse {
    let status = state.sync_state.snapshot().await;
    (StatusCode::OK, Json(status))
}

/// API-level errors with their HTTP mappings.
#[derive(Debug)]
pub enum ChatApiError {
    BadRequest(String),
    NotFound(String),
    VendorFailure(String),
    Internal(String),
}

impl From<ProcessingError> for ChatApiError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Vendor(e) => ChatApiError::VendorFailure(e.to_string()),
            ProcessingError::Store(e) => ChatApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ChatApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("bad_request", msg),
            ),
            ChatApiError::NotFound(session_id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(
                    "not_found",
                    format!("No conversation for session '{session_id}'"),
                ),
            ),
            ChatApiError::VendorFailure(msg) => {
                tracing::warn!("Vendor failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new("vendor_failure", "The assistant is temporarily unavailable"),
                )
            }
            ChatApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal", "An internal error occurred"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}
