//! PostgreSQL implementation of ConversationStore.
//!
//! One row per session. Messages and the user profile are stored as jsonb;
//! the whole record is replaced on every upsert.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{
    ConversationRecord, IntentLevel, Message, Stage, UserProfile,
};
use crate::domain::foundation::StoreError;
use crate::ports::ConversationStore;

/// PostgreSQL implementation of ConversationStore.
#[derive(Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    /// Creates a new PostgresConversationStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn find(&self, session_id: &str) -> Result<Option<ConversationRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT session_id, messages, current_stage, intent_level,
                   user_profile, created_at, updated_at
            FROM conversations
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch conversation: {}", e)))?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let messages_json: serde_json::Value = row.get("messages");
        let messages: Vec<Message> = serde_json::from_value(messages_json)
            .map_err(|e| StoreError::corrupt(format!("Invalid messages json: {}", e)))?;

        let profile_json: serde_json::Value = row.get("user_profile");
        let user_profile: UserProfile = serde_json::from_value(profile_json)
            .map_err(|e| StoreError::corrupt(format!("Invalid profile json: {}", e)))?;

        let stage_str: &str = row.get("current_stage");
        let intent_str: &str = row.get("intent_level");

        Ok(Some(ConversationRecord {
            session_id: row.get("session_id"),
            messages,
            current_stage: str_to_stage(stage_str)?,
            intent_level: str_to_intent(intent_str)?,
            user_profile,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    async fn upsert(&self, record: &ConversationRecord) -> Result<(), StoreError> {
        let messages = serde_json::to_value(&record.messages)
            .map_err(|e| StoreError::corrupt(format!("Failed to encode messages: {}", e)))?;
        let profile = serde_json::to_value(&record.user_profile)
            .map_err(|e| StoreError::corrupt(format!("Failed to encode profile: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO conversations (
                session_id, messages, current_stage, intent_level,
                user_profile, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (session_id) DO UPDATE SET
                messages = EXCLUDED.messages,
                current_stage = EXCLUDED.current_stage,
                intent_level = EXCLUDED.intent_level,
                user_profile = EXCLUDED.user_profile,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&record.session_id)
        .bind(messages)
        .bind(record.current_stage.as_str())
        .bind(record.intent_level.as_str())
        .bind(profile)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to upsert conversation: {}", e)))?;

        Ok(())
    }
}

fn str_to_stage(s: &str) -> Result<Stage, StoreError> {
    match s {
        "hook" => Ok(Stage::Hook),
        "engage" => Ok(Stage::Engage),
        "confirm" => Ok(Stage::Confirm),
        "recommend" => Ok(Stage::Recommend),
        "convert" => Ok(Stage::Convert),
        "support" => Ok(Stage::Support),
        _ => Err(StoreError::corrupt(format!("Invalid stage: {}", s))),
    }
}

fn str_to_intent(s: &str) -> Result<IntentLevel, StoreError> {
    match s {
        "low" => Ok(IntentLevel::Low),
        "medium" => Ok(IntentLevel::Medium),
        "high" => Ok(IntentLevel::High),
        _ => Err(StoreError::corrupt(format!("Invalid intent level: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_round_trips_through_labels() {
        for stage in [
            Stage::Hook,
            Stage::Engage,
            Stage::Confirm,
            Stage::Recommend,
            Stage::Convert,
            Stage::Support,
        ] {
            assert_eq!(str_to_stage(stage.as_str()).unwrap(), stage);
        }
        assert!(str_to_stage("bogus").is_err());
    }

    #[test]
    fn intent_round_trips_through_labels() {
        for intent in [IntentLevel::Low, IntentLevel::Medium, IntentLevel::High] {
            assert_eq!(str_to_intent(intent.as_str()).unwrap(), intent);
        }
        assert!(str_to_intent("bogus").is_err());
    }
}
