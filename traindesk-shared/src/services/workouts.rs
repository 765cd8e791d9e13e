/// Workout ledger
///
/// A workout and its set of linked clients are one unit: create, update and
/// delete each run in a single transaction, and update replaces the link set
/// wholesale.
///
/// # Example
///
/// ```no_run
/// use traindesk_shared::auth::middleware::AuthContext;
/// use traindesk_shared::services::workouts::{create_workout, WorkoutInput};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, auth: AuthContext) -> Result<(), Box<dyn std::error::Error>> {
/// let workout = create_workout(
///     &pool,
///     &auth,
///     WorkoutInput {
///         date: "2024-01-15".to_string(),
///         duration_min: 45,
///         workout_type: "cardio".to_string(),
///         client_ids: vec![],
///         notes: None,
///     },
/// )
/// .await?;
/// assert!(workout.client_ids.is_empty());
/// # Ok(())
/// # }
/// ```

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::middleware::AuthContext,
    error::{FieldError, ServiceError, ServiceResult},
    models::{
        client::Client,
        workout::{Workout, WorkoutClient, WorkoutFields, WorkoutType},
    },
};

/// Shortest accepted workout, in minutes
pub const MIN_DURATION_MIN: i32 = 1;

/// Longest accepted workout, in minutes
pub const MAX_DURATION_MIN: i32 = 300;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Message for client ids the caller does not own
pub const FOREIGN_CLIENT_MESSAGE: &str =
    "one or more client_ids do not belong to the current trainer";

/// Workout as submitted by a client, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkoutInput {
    /// `YYYY-MM-DD`
    pub date: String,

    pub duration_min: i32,

    #[serde(rename = "type")]
    pub workout_type: String,

    pub client_ids: Vec<String>,

    pub notes: Option<String>,
}

/// Workout input with every field parsed and range-checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedWorkout {
    pub date: NaiveDate,
    pub duration_min: i32,
    pub workout_type: WorkoutType,

    /// Distinct ids, in submission order
    pub client_ids: Vec<Uuid>,

    pub notes: Option<String>,
}

impl ValidatedWorkout {
    fn fields(&self) -> WorkoutFields<'_> {
        WorkoutFields {
            date: self.date,
            duration_min: self.duration_min,
            workout_type: self.workout_type,
            notes: self.notes.as_deref(),
        }
    }
}

impl WorkoutInput {
    /// Parses and checks every field, collecting all failures
    pub fn validate(self) -> ServiceResult<ValidatedWorkout> {
        let mut errors = Vec::new();

        let date = match parse_date(&self.date) {
            Some(date) => Some(date),
            None => {
                errors.push(FieldError::new("date", "date must be a valid YYYY-MM-DD date"));
                None
            }
        };

        if !(MIN_DURATION_MIN..=MAX_DURATION_MIN).contains(&self.duration_min) {
            errors.push(FieldError::new(
                "duration_min",
                format!(
                    "duration_min must be between {} and {}",
                    MIN_DURATION_MIN, MAX_DURATION_MIN
                ),
            ));
        }

        let workout_type = match self.workout_type.parse::<WorkoutType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push(FieldError::new(
                    "type",
                    "type must be one of cardio, strength, stretch, functional",
                ));
                None
            }
        };

        let mut client_ids = Vec::with_capacity(self.client_ids.len());
        let mut seen = HashSet::new();
        for (i, raw) in self.client_ids.iter().enumerate() {
            match Uuid::parse_str(raw) {
                Ok(id) if seen.insert(id) => client_ids.push(id),
                Ok(_) => errors.push(FieldError::new(
                    "client_ids",
                    format!("client_ids[{}] is a duplicate", i),
                )),
                Err(_) => errors.push(FieldError::new(
                    "client_ids",
                    format!("client_ids[{}] is not a valid UUID", i),
                )),
            }
        }

        match (date, workout_type) {
            (Some(date), Some(workout_type)) if errors.is_empty() => Ok(ValidatedWorkout {
                date,
                duration_min: self.duration_min,
                workout_type,
                client_ids,
                notes: self.notes,
            }),
            _ => Err(ServiceError::Validation(errors)),
        }
    }
}

/// Strict `YYYY-MM-DD`, zero-padded
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Public view of a workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub id: Uuid,

    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    pub duration_min: i32,

    #[serde(rename = "type")]
    pub workout_type: WorkoutType,

    pub client_ids: Vec<Uuid>,

    pub notes: Option<String>,
}

impl WorkoutSummary {
    fn new(workout: Workout, client_ids: Vec<Uuid>) -> Self {
        Self {
            id: workout.id,
            date: workout.date,
            duration_min: workout.duration_min,
            workout_type: workout.workout_type,
            client_ids,
            notes: workout.notes,
        }
    }
}

/// Fails unless every id in `client_ids` names a client owned by `trainer_id`
async fn ensure_clients_owned(
    conn: &mut PgConnection,
    trainer_id: Uuid,
    client_ids: &[Uuid],
) -> ServiceResult<()> {
    if client_ids.is_empty() {
        return Ok(());
    }

    let owned = Client::count_owned(conn, trainer_id, client_ids).await?;
    if owned != client_ids.len() as i64 {
        debug!(
            trainer_id = %trainer_id,
            requested = client_ids.len(),
            owned,
            "Rejected workout with foreign client ids"
        );
        return Err(ServiceError::invalid("client_ids", FOREIGN_CLIENT_MESSAGE));
    }

    Ok(())
}

fn workout_not_found() -> ServiceError {
    ServiceError::NotFound("workout not found".to_string())
}

/// Creates a workout and links its clients
///
/// The response echoes `client_ids` in submission order.
pub async fn create_workout(
    pool: &PgPool,
    auth: &AuthContext,
    input: WorkoutInput,
) -> ServiceResult<WorkoutSummary> {
    let workout = input.validate()?;

    let mut tx = pool.begin().await?;

    ensure_clients_owned(&mut *tx, auth.trainer_id, &workout.client_ids).await?;
    let row = Workout::insert(&mut *tx, auth.trainer_id, workout.fields()).await?;
    WorkoutClient::insert_many(&mut *tx, row.id, &workout.client_ids).await?;

    tx.commit().await?;

    info!(trainer_id = %auth.trainer_id, workout_id = %row.id, "Workout created");
    Ok(WorkoutSummary::new(row, workout.client_ids))
}

/// Replaces every field and the whole link set of an owned workout
///
/// # Errors
///
/// - `Validation` for bad input or client ids the caller does not own
/// - `NotFound` when the workout does not exist or is not the caller's
pub async fn update_workout(
    pool: &PgPool,
    auth: &AuthContext,
    workout_id: Uuid,
    input: WorkoutInput,
) -> ServiceResult<WorkoutSummary> {
    let workout = input.validate()?;

    let mut tx = pool.begin().await?;

    let row = Workout::update_owned(&mut *tx, workout_id, auth.trainer_id, workout.fields())
        .await?
        .ok_or_else(workout_not_found)?;
    ensure_clients_owned(&mut *tx, auth.trainer_id, &workout.client_ids).await?;
    WorkoutClient::delete_for(&mut *tx, row.id).await?;
    WorkoutClient::insert_many(&mut *tx, row.id, &workout.client_ids).await?;

    tx.commit().await?;

    info!(trainer_id = %auth.trainer_id, workout_id = %row.id, "Workout updated");
    Ok(WorkoutSummary::new(row, workout.client_ids))
}

/// Deletes an owned workout and its links
pub async fn delete_workout(pool: &PgPool, auth: &AuthContext, workout_id: Uuid) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    Workout::lock_owned(&mut *tx, workout_id, auth.trainer_id)
        .await?
        .ok_or_else(workout_not_found)?;
    WorkoutClient::delete_for(&mut *tx, workout_id).await?;
    Workout::delete(&mut *tx, workout_id).await?;

    tx.commit().await?;

    info!(trainer_id = %auth.trainer_id, workout_id = %workout_id, "Workout deleted");
    Ok(())
}

/// Fetches an owned workout; client ids come back sorted ascending
pub async fn get_workout(
    pool: &PgPool,
    auth: &AuthContext,
    workout_id: Uuid,
) -> ServiceResult<WorkoutSummary> {
    let row = Workout::find_owned(pool, workout_id, auth.trainer_id)
        .await?
        .ok_or_else(workout_not_found)?;
    let client_ids = WorkoutClient::client_ids_for(pool, row.id).await?;

    Ok(WorkoutSummary::new(row, client_ids))
}

/// Lists the caller's workouts, newest date first
///
/// Links for all returned workouts are loaded with one query.
pub async fn list_workouts(pool: &PgPool, auth: &AuthContext) -> ServiceResult<Vec<WorkoutSummary>> {
    let rows = Workout::list_by_owner(pool, auth.trainer_id).await?;

    let ids: Vec<Uuid> = rows.iter().map(|w| w.id).collect();
    let mut links: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in WorkoutClient::list_for_many(pool, &ids).await? {
        links.entry(link.workout_id).or_default().push(link.client_id);
    }

    debug!(trainer_id = %auth.trainer_id, count = rows.len(), "Listed workouts");

    Ok(rows
        .into_iter()
        .map(|row| {
            let client_ids = links.remove(&row.id).unwrap_or_default();
            WorkoutSummary::new(row, client_ids)
        })
        .collect())
}
