/// Middleware for the API server
///
/// - `deadline`: Per-request time limit answered with 503 on expiry
///
/// Bearer-token authentication lives in [`crate::app`] next to the router,
/// since it only needs the JWT secret from the application state.

pub mod deadline;
