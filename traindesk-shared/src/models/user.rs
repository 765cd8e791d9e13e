/// Trainer account model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     trainer_name TEXT NOT NULL,
///     email_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

/// A trainer account
///
/// Not `Serialize`; responses use `services::accounts::AccountSummary`.
#[derive(Clone, sqlx::FromRow)]
pub struct User {
    /// Unique account ID
    pub id: Uuid,

    /// Login email, unique and case-sensitive as stored
    pub email: String,

    /// Argon2id PHC hash
    pub password_hash: String,

    /// Display name shown to the trainer
    pub trainer_name: String,

    /// Set once a verification code has been redeemed
    pub email_verified: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("trainer_name", &self.trainer_name)
            .field("email_verified", &self.email_verified)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Input for creating an account
#[derive(Clone)]
pub struct CreateUser {
    pub email: String,

    /// Argon2id hash, never the plaintext password
    pub password_hash: String,

    pub trainer_name: String,
}

impl User {
    /// Inserts a new, unverified account
    ///
    /// # Errors
    ///
    /// A duplicate email fails with a unique violation on `users_email_key`.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, trainer_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, trainer_name, email_verified,
                      created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.trainer_name)
        .fetch_one(executor)
        .await
    }

    /// Finds an account by exact email
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, trainer_name, email_verified,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Marks the account's email as verified
    ///
    /// Returns the updated account, or `None` if it no longer exists.
    pub async fn mark_verified<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email_verified = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, trainer_name, email_verified,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ann@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            trainer_name: "Ann".to_string(),
            email_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let debug = format!("{:?}", user);
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("ann@example.com"));
        assert!(!debug.contains("argon2id"));
    }
}
