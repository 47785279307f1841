//! User management route handlers

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::models::{AuthUser, Role};
use crate::auth::policy;
use crate::error::{Error, Result};
use crate::store::{UserRecord, UserStore, UserUpdate};

use super::server::SharedState;
use super::MessageResponse;

/// GET /api/users (admin)
pub async fn list_users(State(state): State<SharedState>) -> Result<Json<Vec<UserRecord>>> {
    Ok(Json(state.users.list_users().await?))
}

/// GET /api/users/{id}
///
/// The ownership check runs before the lookup: a Member probing another
/// user's id gets 403, never a 404 that would confirm existence.
pub async fn get_user(
    State(state): State<SharedState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRecord>> {
    if !policy::can_view_user(&caller, id) {
        return Err(Error::Forbidden);
    }
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(Error::NotFound("User"))?;
    Ok(Json(user))
}

/// Apply a profile update on behalf of `caller`, enforcing the role policy.
pub async fn apply_user_update(
    users: &dyn UserStore,
    caller: &AuthUser,
    id: Uuid,
    mut update: UserUpdate,
) -> Result<UserRecord> {
    if !policy::can_view_user(caller, id) {
        return Err(Error::Forbidden);
    }
    let target = users.find_by_id(id).await?.ok_or(Error::NotFound("User"))?;

    if !policy::can_edit_user(caller, target.id, target.role) {
        return Err(Error::Forbidden);
    }
    // The role field is immutable under self-edit; it is dropped, not
    // rejected, so a Member updating their own profile never fails on it.
    if caller.role == Role::Member {
        update.role = None;
    }
    if let Some(new_role) = update.role {
        if new_role != target.role && !policy::can_change_role(caller.role, target.role) {
            return Err(Error::Forbidden);
        }
    }

    users
        .update_user(id, update)
        .await?
        .ok_or(Error::NotFound("User"))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<SharedState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UserRecord>> {
    let updated = apply_user_update(state.users.as_ref(), &caller, id, update).await?;
    Ok(Json(updated))
}

/// PUT /api/users/{id}/approve (admin)
pub async fn approve_user(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRecord>> {
    let user = state
        .users
        .approve_user(id)
        .await?
        .ok_or(Error::NotFound("User"))?;
    tracing::info!(user_id = %user.id, "account approved");
    Ok(Json(user))
}

/// DELETE /api/users/{id} (admin)
pub async fn delete_user(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    if !state.users.delete_user(id).await? {
        return Err(Error::NotFound("User"));
    }
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
