/// Client endpoints
///
/// Both routes require a bearer token; results are scoped to the caller.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use traindesk_shared::{
    auth::middleware::AuthContext,
    services::clients::{self, ClientSummary, CreateClientInput},
};

/// `GET /clients` - the caller's clients, ordered by last then first name
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ClientSummary>>> {
    let clients = clients::list_clients(&state.db, &auth).await?;
    Ok(Json(clients))
}

/// `POST /clients` - create a client, `201` with `{id, first_name, last_name}`
pub async fn create_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateClientInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ClientSummary>)> {
    let Json(input) = payload?;

    let client = clients::create_client(&state.db, &auth, input).await?;

    Ok((StatusCode::CREATED, Json(client)))
}
