//! Error types shared by the persistence ports.

use thiserror::Error;

/// Errors surfaced by the conversation and product stores.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,

    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(String),

    /// A stored record could not be decoded into its domain shape.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Creates a database error from any displayable source.
    pub fn database(err: impl std::fmt::Display) -> Self {
        StoreError::Database(err.to_string())
    }

    /// Creates a corrupt-record error from any displayable source.
    pub fn corrupt(err: impl std::fmt::Display) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}
