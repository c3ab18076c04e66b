use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::{AdminUser, AppState, CurrentUser, ExternalUserId};
use crate::domain::{Id, User, UserRole, UserSync, UserUpdate};
use crate::error::{ApiError, ApiResult};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync", post(sync_user))
        .route("/me", get(me).put(update_me))
        .route("/{id}", get(by_external_id))
        .route("/{id}/role", put(set_role))
}

async fn sync_user(State(state): State<AppState>, Json(body): Json<UserSync>) -> ApiResult<Json<User>> {
    if body.external_id.trim().is_empty() {
        return Err(ApiError::BadRequest("external_id must not be empty".into()));
    }
    let user = state.store.sync_user(body).await?;
    info!(user_id = user.id, role = ?user.role, "user synced");
    Ok(Json(user))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn update_me(
    State(state): State<AppState>,
    ExternalUserId(external_id): ExternalUserId,
    Json(update): Json<UserUpdate>,
) -> ApiResult<Json<User>> {
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".into()));
    }
    state
        .store
        .update_user(&external_id, update)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User", external_id))
}

async fn by_external_id(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> ApiResult<Json<User>> {
    state
        .store
        .user_by_external_id(&external_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User", external_id))
}

#[derive(Deserialize)]
struct RoleChange {
    role: UserRole,
}

async fn set_role(
    State(state): State<AppState>,
    AdminUser(caller): AdminUser,
    Path(id): Path<Id>,
    Json(body): Json<RoleChange>,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .set_user_role(id, body.role)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;
    info!(admin_id = caller.id, user_id = id, role = ?user.role, "role changed");
    Ok(Json(user))
}
