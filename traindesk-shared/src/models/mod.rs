/// Database models for TrainDesk
///
/// Each model owns its SQL. Functions are generic over [`sqlx::PgExecutor`],
/// so the same query runs against the pool or inside a transaction
/// (`&mut *tx`).
///
/// # Models
///
/// - `user`: Trainer accounts
/// - `email_verification`: Outstanding verification codes
/// - `client`: Clients owned by a trainer
/// - `workout`: Workouts and their client links
///
/// # Example
///
/// ```no_run
/// use traindesk_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "coach@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         trainer_name: "Coach".to_string(),
///     },
/// )
/// .await?;
///
/// let found = User::find_by_email(&pool, "coach@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

pub mod client;
pub mod email_verification;
pub mod user;
pub mod workout;
