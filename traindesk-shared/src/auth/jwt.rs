/// Session token issuance and validation
///
/// Tokens are HS256-signed JWTs carrying the trainer's account id as `sub`.
/// They live for seven days; there is no refresh flow, a trainer simply logs
/// in again.
///
/// # Example
///
/// ```
/// use traindesk_shared::auth::jwt::{issue_token, validate_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let trainer_id = Uuid::new_v4();
/// let secret = "a-secret-of-at-least-thirty-two-bytes!!";
///
/// let token = issue_token(trainer_id, secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, trainer_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped on every token
pub const ISSUER: &str = "traindesk";

/// Token lifetime
pub fn token_ttl() -> Duration {
    Duration::days(7)
}

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature mismatch, malformed token, bad claims
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was not issued by this service
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - trainer account id
    pub sub: Uuid,

    /// Issuer - always "traindesk"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Claims for `trainer_id` expiring after the standard seven days
    pub fn new(trainer_id: Uuid) -> Self {
        Self::with_expiration(trainer_id, token_ttl())
    }

    /// Claims with a custom lifetime (negative values yield expired claims)
    pub fn with_expiration(trainer_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: trainer_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }
}

/// Signs `claims` with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a seven-day session token for a trainer
pub fn issue_token(trainer_id: Uuid, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(trainer_id), secret)
}

/// Validates a token and returns its claims
///
/// Checks the signature, `exp`, `nbf` and the issuer. Expiry is evaluated
/// with zero leeway.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let trainer_id = Uuid::new_v4();
        let claims = Claims::new(trainer_id);

        assert_eq!(claims.sub, trainer_id);
        assert_eq!(claims.iss, "traindesk");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_issue_and_validate_token() {
        let trainer_id = Uuid::new_v4();
        let token = issue_token(trainer_id, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, trainer_id);
        assert_eq!(validated.iss, ISSUER);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), SECRET).expect("Should create token");

        let result = validate_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-3600));
        assert!(claims.exp < Utc::now().timestamp());

        let token = create_token(&claims, SECRET).expect("Should create token");
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_foreign_issuer() {
        let mut claims = Claims::new(Uuid::new_v4());
        claims.iss = "someone-else".to_string();

        let token = create_token(&claims, SECRET).expect("Should create token");
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::InvalidIssuer)));
    }

    #[test]
    fn test_validate_garbage() {
        assert!(validate_token("not.a.jwt", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
