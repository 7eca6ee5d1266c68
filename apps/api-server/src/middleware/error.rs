//! Error handling - maps every failure onto the `{success: false, error}` envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use inkwell_core::error::{DomainError, RepoError};
use inkwell_core::ports::AuthError;
use inkwell_shared::{ErrorResponse, FieldError};
use std::fmt;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Names the missing entity, e.g. `"Post"`.
    NotFound(&'static str),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
    Validation(Vec<FieldError>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(what) => write!(f, "{} not found", what),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(what) => ErrorResponse::not_found(what),
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg) => ErrorResponse::new(msg.clone()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => AppError::NotFound(entity_type),
            DomainError::Validation { field, message } => {
                AppError::Validation(vec![FieldError::new(field, message)])
            }
            DomainError::InvalidReference(_) => AppError::BadRequest(err.to_string()),
            DomainError::Duplicate(msg) => AppError::BadRequest(msg),
            DomainError::Forbidden => AppError::Forbidden(err.to_string()),
            DomainError::InUse(msg) => AppError::Conflict(msg),
            DomainError::Repo(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource"),
            RepoError::Constraint(msg) => {
                tracing::warn!("Constraint violation: {}", msg);
                AppError::BadRequest("Resource already exists".to_string())
            }
            RepoError::Connection(msg) => {
                AppError::Internal(format!("Database connection error: {}", msg))
            }
            RepoError::Query(msg) => AppError::Internal(format!("Database query error: {}", msg)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            AuthError::MissingAuth => {
                AppError::Unauthorized("No token, authorization denied".to_string())
            }
            AuthError::TokenExpired | AuthError::InvalidToken(_) => {
                AppError::Unauthorized("Token is not valid".to_string())
            }
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field));
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation(fields)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
