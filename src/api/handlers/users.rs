//! Roster inspection handlers.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{RosterResponse, UserStatusResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RelayError};

/// `GET /users` — Current roster snapshot.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    summary = "List online users",
    description = "Returns every registered username plus the number of live connections. Order is unspecified.",
    responses(
        (status = 200, description = "Roster snapshot", body = RosterResponse),
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Json<RosterResponse> {
    let snapshot = state.relay.snapshot().await;
    Json(RosterResponse {
        count: snapshot.users.len(),
        users: snapshot.users,
        connections: snapshot.connections,
        generated_at: Utc::now(),
    })
}

/// `GET /users/{username}` — Whether a username is currently addressable.
///
/// # Errors
///
/// Returns [`RelayError::UserNotFound`] if no connection holds `username`.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    tag = "Users",
    summary = "Check a username",
    description = "Succeeds when `@username` messages would currently be delivered.",
    params(("username" = String, Path, description = "Username to look up")),
    responses(
        (status = 200, description = "User is online", body = UserStatusResponse),
        (status = 404, description = "User is not online", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserStatusResponse>, RelayError> {
    if state.relay.find_user(&username).await.is_none() {
        return Err(RelayError::UserNotFound(username));
    }
    Ok(Json(UserStatusResponse {
        username,
        online: true,
    }))
}

/// User routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{username}", get(get_user))
}
