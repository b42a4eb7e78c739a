//! Centralized error types for ContextWeave.

use thiserror::Error;

/// Main error type for domain operations.
#[derive(Error, Debug)]
pub enum WeaveError {
    #[error("Decision not found: {0}")]
    DecisionNotFound(i64),

    #[error("Event not found: {0}")]
    EventNotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] weave_db::DbError),
}

/// Result type for domain operations.
pub type WeaveResult<T> = Result<T, WeaveError>;

impl WeaveError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// True for the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DecisionNotFound(_)
                | Self::EventNotFound(_)
                | Self::Database(weave_db::DbError::NotFound(_))
        )
    }
}
