//! Conversation domain: the per-session record, its messages, and the
//! stage transition engine that drives the assistant's behavior.

mod intent;
mod message;
mod profile;
mod prompts;
mod record;
mod stage;

pub use intent::IntentLevel;
pub use message::{Message, MessageRole};
pub use profile::UserProfile;
pub use prompts::stage_prompt;
pub use record::ConversationRecord;
pub use stage::{is_policy_question, next_stage, Stage};
