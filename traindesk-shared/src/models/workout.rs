/// Workout model and its client links
///
/// A workout row and its `workout_clients` link set are always written
/// together inside one transaction by `services::workouts`. Nothing else
/// writes links.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE workout_type AS ENUM ('cardio', 'strength', 'stretch', 'functional');
///
/// CREATE TABLE workouts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     date DATE NOT NULL,
///     duration_min INTEGER NOT NULL CHECK (duration_min BETWEEN 1 AND 300),
///     workout_type workout_type NOT NULL,
///     notes TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE workout_clients (
///     workout_id UUID NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
///     client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
///     PRIMARY KEY (workout_id, client_id)
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of training session
///
/// Maps to the PostgreSQL `workout_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workout_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Cardio,
    Strength,
    Stretch,
    Functional,
}

impl WorkoutType {
    /// Every accepted type, in declaration order
    pub const ALL: [WorkoutType; 4] = [
        WorkoutType::Cardio,
        WorkoutType::Strength,
        WorkoutType::Stretch,
        WorkoutType::Functional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Cardio => "cardio",
            WorkoutType::Strength => "strength",
            WorkoutType::Stretch => "stretch",
            WorkoutType::Functional => "functional",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known workout type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown workout type: {0}")]
pub struct UnknownWorkoutType(pub String);

impl FromStr for WorkoutType {
    type Err = UnknownWorkoutType;

    /// Exact, case-sensitive match against the lowercase names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkoutType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownWorkoutType(s.to_string()))
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Workout {
    pub id: Uuid,

    /// Owning trainer
    pub user_id: Uuid,

    /// Calendar date of the session
    pub date: NaiveDate,

    /// Minutes, 1..=300
    pub duration_min: i32,

    pub workout_type: WorkoutType,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values written on insert and update
#[derive(Debug, Clone, Copy)]
pub struct WorkoutFields<'a> {
    pub date: NaiveDate,
    pub duration_min: i32,
    pub workout_type: WorkoutType,
    pub notes: Option<&'a str>,
}

/// One row of `workout_clients`
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct WorkoutClient {
    pub workout_id: Uuid,
    pub client_id: Uuid,
}

impl Workout {
    /// Inserts a workout owned by `user_id`
    pub async fn insert<'e, E>(
        executor: E,
        user_id: Uuid,
        fields: WorkoutFields<'_>,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (user_id, date, duration_min, workout_type, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, date, duration_min, workout_type, notes,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(fields.date)
        .bind(fields.duration_min)
        .bind(fields.workout_type)
        .bind(fields.notes)
        .fetch_one(executor)
        .await
    }

    /// Overwrites every mutable column of an owned workout
    ///
    /// Returns `None` when the workout does not exist or belongs to someone
    /// else.
    pub async fn update_owned<'e, E>(
        executor: E,
        id: Uuid,
        user_id: Uuid,
        fields: WorkoutFields<'_>,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workout>(
            r#"
            UPDATE workouts
            SET date = $3, duration_min = $4, workout_type = $5, notes = $6,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, date, duration_min, workout_type, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(fields.date)
        .bind(fields.duration_min)
        .bind(fields.workout_type)
        .bind(fields.notes)
        .fetch_optional(executor)
        .await
    }

    /// Finds an owned workout
    pub async fn find_owned<'e, E>(
        executor: E,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, date, duration_min, workout_type, notes,
                   created_at, updated_at
            FROM workouts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// Finds an owned workout and locks its row until the transaction ends
    pub async fn lock_owned<'e, E>(
        executor: E,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, date, duration_min, workout_type, notes,
                   created_at, updated_at
            FROM workouts
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// Lists a trainer's workouts, newest date first
    pub async fn list_by_owner<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, date, duration_min, workout_type, notes,
                   created_at, updated_at
            FROM workouts
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Deletes a workout row by ID
    ///
    /// Callers must have checked ownership, normally via [`Workout::lock_owned`].
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl WorkoutClient {
    /// Links `client_ids` to a workout in a single statement
    pub async fn insert_many<'e, E>(
        executor: E,
        workout_id: Uuid,
        client_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if client_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO workout_clients (workout_id, client_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(workout_id)
        .bind(client_ids)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Removes every link of a workout
    pub async fn delete_for<'e, E>(executor: E, workout_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM workout_clients WHERE workout_id = $1")
            .bind(workout_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Client IDs linked to one workout, ascending
    pub async fn client_ids_for<'e, E>(executor: E, workout_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT client_id
            FROM workout_clients
            WHERE workout_id = $1
            ORDER BY client_id
            "#,
        )
        .bind(workout_id)
        .fetch_all(executor)
        .await
    }

    /// All links of the given workouts, ordered by workout then client
    pub async fn list_for_many<'e, E>(
        executor: E,
        workout_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if workout_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, WorkoutClient>(
            r#"
            SELECT workout_id, client_id
            FROM workout_clients
            WHERE workout_id = ANY($1)
            ORDER BY workout_id, client_id
            "#,
        )
        .bind(workout_ids)
        .fetch_all(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_type_round_trips_through_str() {
        for t in WorkoutType::ALL {
            assert_eq!(t.as_str().parse::<WorkoutType>(), Ok(t));
            assert_eq!(t.to_string(), t.as_str());
        }
    }

    #[test]
    fn test_workout_type_rejects_unknown() {
        assert_eq!(
            "yoga".parse::<WorkoutType>(),
            Err(UnknownWorkoutType("yoga".to_string()))
        );
        assert!("Cardio".parse::<WorkoutType>().is_err());
        assert!("".parse::<WorkoutType>().is_err());
    }

    #[test]
    fn test_workout_type_serde_is_lowercase() {
        let json = serde_json::to_string(&WorkoutType::Functional).unwrap();
        assert_eq!(json, "\"functional\"");

        let parsed: WorkoutType = serde_json::from_str("\"stretch\"").unwrap();
        assert_eq!(parsed, WorkoutType::Stretch);
    }
}
