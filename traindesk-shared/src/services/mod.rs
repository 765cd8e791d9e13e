/// Business operations
///
/// Every operation takes the pool explicitly and returns
/// [`ServiceResult`](crate::error::ServiceResult). Owner-scoped operations
/// also take the caller's [`AuthContext`](crate::auth::middleware::AuthContext)
/// and filter every query by it.
///
/// Write paths that touch more than one row run inside a single
/// `sqlx::Transaction`: any `?` before `commit` drops the transaction and
/// rolls it back.
///
/// - `accounts`: registration, email verification, login
/// - `clients`: client registry
/// - `workouts`: workout ledger

pub mod accounts;
pub mod clients;
pub mod workouts;

use crate::error::FieldError;

/// Records an error for `field` when `value` is empty after trimming
pub(crate) fn require_not_blank(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", field)));
    }
}
