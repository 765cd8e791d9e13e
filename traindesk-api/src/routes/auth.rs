/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a trainer account (201)
/// - `POST /auth/login` - Exchange credentials for a session token
/// - `POST /auth/verify-email` - Redeem a verification code

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use traindesk_shared::{
    error::ServiceError,
    services::accounts::{
        self, AccountSummary, LoginInput, LoginResult, RegisterInput, VerifyEmailInput,
    },
};

/// Verify-email response
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyEmailResponse {
    pub message: String,
}

/// Register handler
///
/// # Request
///
/// ```json
/// {
///   "email": "a@x.com",
///   "password": "secret1",
///   "trainer_name": "Ann"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `{id, email, trainer_name}`. The verification code is
/// sent by email and never included in the response.
///
/// # Errors
///
/// - 400: Malformed JSON or failed validation
/// - 409: Email already registered
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AccountSummary>)> {
    let Json(input) = payload?;

    let account = accounts::register(&state.db, state.mailer.as_ref(), input).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Login handler
///
/// # Response
///
/// `{token, id, email, trainer_name}`; the token is valid for seven days.
///
/// # Errors
///
/// - 400: Malformed JSON or missing fields
/// - 401: Wrong credentials, or email not yet verified
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> ApiResult<Json<LoginResult>> {
    let Json(input) = payload?;

    let result = accounts::login(&state.db, state.jwt_secret(), input).await?;

    Ok(Json(result))
}

/// Verify-email handler
///
/// # Errors
///
/// - 400: Unknown account, invalid or expired code, or already verified
pub async fn verify_email(
    State(state): State<AppState>,
    payload: Result<Json<VerifyEmailInput>, JsonRejection>,
) -> ApiResult<Json<VerifyEmailResponse>> {
    let Json(input) = payload?;

    accounts::verify_email(&state.db, input)
        .await
        .map_err(|e| match e {
            // Unknown email is a 400 here, like any other failed redemption
            ServiceError::NotFound(msg) => ApiError::BadRequest(msg),
            other => ApiError::from(other),
        })?;

    Ok(Json(VerifyEmailResponse {
        message: "email verified".to_string(),
    }))
}
