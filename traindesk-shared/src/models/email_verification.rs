/// Outstanding email verification codes
///
/// At most one record exists per account: [`EmailVerification::issue`]
/// replaces any earlier code. A record is deleted when redeemed and cascades
/// away with its account.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmailVerification {
    pub id: Uuid,

    /// Account the code was issued for
    pub user_id: Uuid,

    /// Six-digit code
    pub code: String,

    /// The code is rejected at or after this instant
    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

impl EmailVerification {
    /// Replaces any outstanding code for `user_id` with a new one
    ///
    /// Callers pass `&mut *tx` so the delete and insert commit together.
    pub async fn issue(
        conn: &mut PgConnection,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query("DELETE FROM email_verifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query_as::<_, EmailVerification>(
            r#"
            INSERT INTO email_verifications (user_id, code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, code, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&mut *conn)
        .await
    }

    /// Finds the record matching an account and code
    pub async fn find_by_user_and_code<'e, E>(
        executor: E,
        user_id: Uuid,
        code: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, EmailVerification>(
            r#"
            SELECT id, user_id, code, expires_at, created_at
            FROM email_verifications
            WHERE user_id = $1 AND code = $2
            "#,
        )
        .bind(user_id)
        .bind(code)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a record by ID, returning whether it existed
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM email_verifications WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
