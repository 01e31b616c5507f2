//! Knowledge aggregation port.
//!
//! Supplies grounding data (matching products plus policy/FAQ text) for the
//! model prompt. Like intent detection, it is consumed as a black box and
//! must degrade to empty results instead of failing the turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ProductRecord;

/// A source that contributed grounding data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSource {
    /// Source kind, e.g. "product" or "policy".
    pub kind: String,
    /// Human-readable title.
    pub title: String,
}

impl KnowledgeSource {
    pub fn product(title: impl Into<String>) -> Self {
        Self {
            kind: "product".to_string(),
            title: title.into(),
        }
    }

    pub fn policy(title: impl Into<String>) -> Self {
        Self {
            kind: "policy".to_string(),
            title: title.into(),
        }
    }
}

/// Aggregated grounding data for one query.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeResults {
    pub products: Vec<ProductRecord>,
    pub sources: Vec<KnowledgeSource>,
}

/// Port for the external knowledge aggregation service.
#[async_trait]
pub trait KnowledgeAggregator: Send + Sync {
    /// Gathers grounding data relevant to the query.
    async fn search(&self, query: &str) -> KnowledgeResults;

    /// Renders results as a prompt block the model can be grounded on.
    fn format_for_ai(&self, results: &KnowledgeResults, query: &str) -> String;
}
