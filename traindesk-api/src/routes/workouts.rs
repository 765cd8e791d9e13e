/// Workout endpoints
///
/// # Endpoints
///
/// - `GET /workouts` - List, newest date first
/// - `POST /workouts` - Create (201)
/// - `GET /workouts/:id` - Fetch one
/// - `PUT /workouts/:id` - Full replace, including the client list
/// - `DELETE /workouts/:id` - Delete (204)
///
/// Workouts that exist but belong to another trainer answer 404, exactly
/// like missing ones.
///
/// # Body
///
/// ```json
/// {
///   "date": "2024-01-15",
///   "duration_min": 45,
///   "type": "cardio",
///   "client_ids": ["6f1c..."],
///   "notes": "intervals"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use traindesk_shared::{
    auth::middleware::AuthContext,
    services::workouts::{self, WorkoutInput, WorkoutSummary},
};
use uuid::Uuid;

pub async fn list_workouts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<WorkoutSummary>>> {
    let workouts = workouts::list_workouts(&state.db, &auth).await?;
    Ok(Json(workouts))
}

pub async fn create_workout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<WorkoutInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WorkoutSummary>)> {
    let Json(input) = payload?;

    let workout = workouts::create_workout(&state.db, &auth, input).await?;

    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn get_workout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<WorkoutSummary>> {
    let Path(id) = path?;

    let workout = workouts::get_workout(&state.db, &auth, id).await?;

    Ok(Json(workout))
}

pub async fn update_workout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<WorkoutInput>, JsonRejection>,
) -> ApiResult<Json<WorkoutSummary>> {
    let Path(id) = path?;
    let Json(input) = payload?;

    let workout = workouts::update_workout(&state.db, &auth, id, input).await?;

    Ok(Json(workout))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;

    workouts::delete_workout(&state.db, &auth, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
