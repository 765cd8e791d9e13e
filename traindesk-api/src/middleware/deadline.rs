/// Request deadline middleware
///
/// Every request runs under `tokio::time::timeout`. When the deadline passes
/// the handler future is dropped, which also drops any open transaction and
/// rolls it back, and the client receives `503 service_unavailable`.
///
/// # Example
///
/// ```no_run
/// use axum::{extract::Request, middleware::{self, Next}, routing::get, Router};
/// use std::time::Duration;
/// use traindesk_api::middleware::deadline::enforce_deadline;
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "OK" }))
///     .layer(middleware::from_fn(|req: Request, next: Next| {
///         enforce_deadline(Duration::from_secs(30), req, next)
///     }));
/// ```

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tracing::warn;

/// Runs the rest of the stack with a fixed time limit
pub async fn enforce_deadline(
    limit: Duration,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            warn!(
                %method,
                path = %path,
                timeout_ms = limit.as_millis() as u64,
                "Request exceeded deadline"
            );
            Err(ApiError::ServiceUnavailable(
                "Request did not complete in time".to_string(),
            ))
        }
    }
}

/// Deadline layer reading the limit from configuration
pub async fn request_deadline(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    enforce_deadline(state.config.request_timeout(), req, next).await
}
