//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed on {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// A write referenced an entity that does not exist.
    #[error("Invalid {0}")]
    InvalidReference(&'static str),

    #[error("{0}")]
    Duplicate(String),

    #[error("Not authorized")]
    Forbidden,

    /// The entity is still referenced and cannot be removed.
    #[error("{0}")]
    InUse(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
