/// API route handlers
///
/// Handlers are thin: they extract the request, call the matching operation
/// in `traindesk_shared::services`, and shape the response.
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and email verification
/// - `clients`: Client registry
/// - `workouts`: Workout ledger

pub mod auth;
pub mod clients;
pub mod health;
pub mod workouts;
