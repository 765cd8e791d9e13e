/// Client model
///
/// Every query is scoped by the owning trainer's `user_id`; there is no
/// unscoped lookup.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,

    /// Owning trainer
    pub user_id: Uuid,

    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Creates a client owned by `user_id`
    pub async fn create<'e, E>(
        executor: E,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (user_id, first_name, last_name)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(executor)
        .await
    }

    /// Lists the trainer's clients by last name, then first name
    pub async fn list_by_owner<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, first_name, last_name, created_at, updated_at
            FROM clients
            WHERE user_id = $1
            ORDER BY last_name ASC, first_name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Counts how many of `ids` belong to `user_id`
    ///
    /// Callers compare the result to `ids.len()` to detect foreign or
    /// nonexistent clients; `ids` must be free of duplicates.
    pub async fn count_owned<'e, E>(executor: E, user_id: Uuid, ids: &[Uuid]) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM clients WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id)
        .bind(ids)
        .fetch_one(executor)
        .await
    }
}
