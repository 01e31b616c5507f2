//! Language-model vendor adapters.

mod cohere_provider;
mod groq_provider;
mod mock_provider;

pub use cohere_provider::{CohereConfig, CohereProvider};
pub use groq_provider::{GroqConfig, GroqProvider};
pub use mock_provider::MockProvider;
