//! HTTP DTOs for chat and sync endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent
//! evolution.

use serde::{Deserialize, Serialize};

use crate::application::ProcessedReply;
use crate::domain::catalog::ProductRecord;
use crate::domain::conversation::{
    ConversationRecord, IntentLevel, Message, MessageRole, Stage, UserProfile,
};
use crate::ports::KnowledgeSource;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of POST /api/chat/message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Opaque session identifier chosen by the client.
    pub session_id: String,
    /// The user's message.
    pub message: String,
    /// Vendor override; the gateway default is used when absent.
    #[serde(default)]
    pub model: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response of POST /api/chat/message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReplyView {
    pub reply: String,
    pub stage: Stage,
    pub intent: IntentLevel,
    pub products: Vec<ProductView>,
    pub sources: Vec<KnowledgeSource>,
}

impl From<ProcessedReply> for MessageReplyView {
    fn from(reply: ProcessedReply) -> Self {
        Self {
            reply: reply.reply,
            stage: reply.stage,
            intent: reply.intent,
            products: reply.products.iter().map(ProductView::from).collect(),
            sources: reply.sources,
        }
    }
}

/// View of a recommended product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    /// Reference key: external key when synced, local id otherwise.
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub in_stock: bool,
}

impl From<&ProductRecord> for ProductView {
    fn from(product: &ProductRecord) -> Self {
        Self {
            id: product.reference_key(),
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.image.clone(),
            url: product.url.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// View of a stored conversation for GET /api/chat/conversation/{id}.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub session_id: String,
    pub messages: Vec<MessageView>,
    pub current_stage: Stage,
    pub intent_level: IntentLevel,
    pub user_profile: UserProfile,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ConversationRecord> for ConversationView {
    fn from(record: &ConversationRecord) -> Self {
        Self {
            session_id: record.session_id.clone(),
            messages: record.messages.iter().map(MessageView::from).collect(),
            current_stage: record.current_stage,
            intent_level: record.intent_level,
            user_profile: record.user_profile.clone(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// View of a single message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_refs: Vec<String>,
    pub timestamp: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            product_refs: message.product_refs.clone(),
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_request_accepts_camel_case() {
        let req: SendMessageRequest = serde_json::from_str(
            r#"{"sessionId":"s1","message":"hi","model":"cohere"}"#,
        )
        .unwrap();
        assert_eq!(req.session_id, "s1");
        assert_eq!(req.model.as_deref(), Some("cohere"));
    }

    #[test]
    fn model_is_optional() {
        let req: SendMessageRequest =
            serde_json::from_str(r#"{"sessionId":"s1","message":"hi"}"#).unwrap();
        assert!(req.model.is_none());
    }

    #[test]
    fn product_view_uses_reference_key() {
        let mut product = ProductRecord::manual("Dress", "Dresses", 100.0);
        product.external_key = Some("shopify-7".to_string());
        let view = ProductView::from(&product);
        assert_eq!(view.id, "shopify-7");
    }

    #[test]
    fn conversation_view_serializes_camel_case() {
        let mut record = ConversationRecord::new("s1");
        record.push_user("hello");
        let view = ConversationView::from(&record);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["currentStage"], "hook");
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
