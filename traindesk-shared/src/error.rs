/// Service error taxonomy
///
/// Every business operation in [`crate::services`] returns [`ServiceResult`].
/// Variants map one-to-one onto HTTP statuses in the API crate; storage
/// failures stay wrapped so driver detail never reaches a client.
use serde::{Deserialize, Serialize};

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
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

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// Uniqueness violation (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad credentials or unverified email
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Missing resource, or one the caller does not own
    #[error("Not found: {0}")]
    NotFound(String),

    /// No verification record matches the submitted code
    #[error("Invalid verification code")]
    InvalidCode,

    /// The matching verification record has expired
    #[error("Verification code has expired")]
    ExpiredCode,

    /// The account's email address is already verified
    #[error("Email already verified")]
    AlreadyVerified,

    /// Storage failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Any other internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Shorthand for a single-field validation error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return ServiceError::Conflict(format!(
                    "duplicate value violates constraint {}",
                    constraint
                ));
            }
        }

        ServiceError::Database(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        // HashMap iteration order is unstable
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ServiceError::Validation(details)
    }
}

impl From<crate::auth::password::PasswordError> for ServiceError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<crate::auth::jwt::JwtError> for ServiceError {
    fn from(err: crate::auth::jwt::JwtError) -> Self {
        ServiceError::Internal(format!("Token operation failed: {}", err))
    }
}
