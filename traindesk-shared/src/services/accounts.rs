/// Trainer accounts: registration, email verification and login
///
/// # Flow
///
/// 1. [`register`] creates an unverified account and its first verification
///    code in one transaction, then hands the code to the mailer.
/// 2. [`verify_email`] redeems the code and marks the account verified.
/// 3. [`login`] issues a session token, but only for verified accounts.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{
        jwt::issue_token,
        password::{hash_password, verify_password},
        verification::{check_not_expired, code_expiry, generate_code, is_well_formed},
    },
    error::{ServiceError, ServiceResult},
    mail::VerificationMailer,
    models::{
        email_verification::EmailVerification,
        user::{CreateUser, User},
    },
};

/// Returned for unknown emails and wrong passwords alike
pub const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Returned when the password is correct but the email is unverified
pub const EMAIL_NOT_VERIFIED: &str = "email not verified";

/// Registration input
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "trainer_name is required"))]
    pub trainer_name: String,
}

/// Login input
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Email verification input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct VerifyEmailInput {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub email: String,
    pub trainer_name: String,
}

impl From<&User> for AccountSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            trainer_name: user.trainer_name.clone(),
        }
    }
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    /// Seven-day session token
    pub token: String,

    #[serde(flatten)]
    pub account: AccountSummary,
}

/// Registers a new trainer account
///
/// The account row and its verification record commit together. Mail
/// delivery runs afterwards; a delivery failure is logged and the account
/// still exists.
///
/// # Errors
///
/// - `Validation` for an empty email or trainer name, or a short password
/// - `Conflict` when the email is already registered
pub async fn register(
    pool: &PgPool,
    mailer: &dyn VerificationMailer,
    input: RegisterInput,
) -> ServiceResult<AccountSummary> {
    input.validate()?;

    let password_hash = hash_password(&input.password)?;
    let code = generate_code();

    let mut tx = pool.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            email: input.email,
            password_hash,
            trainer_name: input.trainer_name,
        },
    )
    .await?;

    EmailVerification::issue(&mut *tx, user.id, &code, code_expiry(Utc::now())).await?;

    tx.commit().await?;

    info!(user_id = %user.id, "Trainer account registered");

    if let Err(e) = mailer
        .send_verification_code(&user.email, &user.trainer_name, &code)
        .await
    {
        warn!(user_id = %user.id, error = %e, "Failed to send verification email");
    }

    Ok(AccountSummary::from(&user))
}

/// Redeems a verification code
///
/// # Errors
///
/// - `NotFound` when no account has this email
/// - `AlreadyVerified` when the account is verified already
/// - `InvalidCode` when no outstanding code matches
/// - `ExpiredCode` when the matching code has expired; it stays in place
pub async fn verify_email(pool: &PgPool, input: VerifyEmailInput) -> ServiceResult<AccountSummary> {
    input.validate()?;

    let user = User::find_by_email(pool, &input.email)
        .await?
        .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))?;

    if user.email_verified {
        return Err(ServiceError::AlreadyVerified);
    }

    if !is_well_formed(&input.code) {
        return Err(ServiceError::InvalidCode);
    }

    let record = EmailVerification::find_by_user_and_code(pool, user.id, &input.code)
        .await?
        .ok_or(ServiceError::InvalidCode)?;

    check_not_expired(record.expires_at, Utc::now())?;

    let mut tx = pool.begin().await?;

    let verified = User::mark_verified(&mut *tx, user.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("account not found".to_string()))?;
    EmailVerification::delete(&mut *tx, record.id).await?;

    tx.commit().await?;

    info!(user_id = %verified.id, "Email verified");
    Ok(AccountSummary::from(&verified))
}

/// Authenticates a trainer and issues a session token
///
/// The password is checked before the verification flag.
///
/// # Errors
///
/// - `Unauthorized("invalid email or password")` for unknown emails and wrong
///   passwords
/// - `Unauthorized("email not verified")` for unverified accounts
pub async fn login(pool: &PgPool, jwt_secret: &str, input: LoginInput) -> ServiceResult<LoginResult> {
    input.validate()?;

    let user = match User::find_by_email(pool, &input.email).await? {
        Some(user) => user,
        None => {
            debug!("Login attempt for unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    if !verify_password(&input.password, &user.password_hash)? {
        debug!(user_id = %user.id, "Login attempt with wrong password");
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    if !user.email_verified {
        return Err(ServiceError::Unauthorized(EMAIL_NOT_VERIFIED.to_string()));
    }

    let token = issue_token(user.id, jwt_secret)?;

    info!(user_id = %user.id, "Trainer logged in");
    Ok(LoginResult {
        token,
        account: AccountSummary::from(&user),
    })
}
