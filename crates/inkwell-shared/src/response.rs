//! Standardized API response envelopes.

use serde::{Deserialize, Serialize};

use crate::dto::PaginationMeta;

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: PaginationMeta) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

/// A validation failure attached to one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error body: `{success: false, error, errors?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,

    /// Human-readable summary.
    pub error: String,

    /// Field-level details for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    // Common error constructors
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::new("Validation failed").with_errors(errors)
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(format!("{what} not found"))
    }

    pub fn internal_error() -> Self {
        Self::new("Server Error")
    }
}
