/// Request authentication
///
/// Validates `Authorization: Bearer <token>` headers and produces the
/// authenticated principal. The API's auth layer inserts it into request
/// extensions; handlers extract it once and pass it explicitly to every
/// service call.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use traindesk_shared::auth::{jwt::issue_token, middleware::authenticate};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-of-at-least-thirty-two-bytes!!";
/// let trainer_id = Uuid::new_v4();
/// let token = issue_token(trainer_id, secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
///
/// let auth = authenticate(&headers, secret).map_err(|e| format!("{:?}", e))?;
/// assert_eq!(auth.trainer_id, trainer_id);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// The authenticated trainer on whose behalf a request runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated trainer account id
    pub trainer_id: Uuid,
}

impl AuthContext {
    /// Creates auth context from a validated token subject
    pub fn from_jwt(trainer_id: Uuid) -> Self {
        Self { trainer_id }
    }
}

/// Error type for request authentication
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header present but not a Bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    Ok(token)
}

/// Validates the bearer token in `headers` and builds the auth context
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    Ok(AuthContext::from_jwt(claims.sub))
}
