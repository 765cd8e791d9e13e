/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: Session token issuance and validation
/// - [`verification`]: Email verification code generation and expiry
/// - [`middleware`]: Bearer-token middleware and the `AuthContext` principal
///
/// # Example
///
/// ```no_run
/// use traindesk_shared::auth::password::{hash_password, verify_password};
/// use traindesk_shared::auth::jwt::{issue_token, validate_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("trainer_password")?;
/// assert!(verify_password("trainer_password", &hash)?);
///
/// let token = issue_token(Uuid::new_v4(), "secret-key")?;
/// let claims = validate_token(&token, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod verification;
