// handlers/elevated/people.rs - Profiles, waitlist and roles

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;

use crate::access::AdminActor;
use crate::app::AppState;
use crate::database::models::{Profile, Role, WaitlistEntry};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/admin/profiles
pub async fn profiles_list(State(state): State<AppState>, _admin: AdminActor) -> ApiResult<Vec<Profile>> {
    Ok(ApiResponse::keyed("profiles", state.store.list_profiles().await?))
}

#[derive(Debug, Deserialize)]
pub struct AdminFlagRequest {
    pub is_admin: bool,
}

/// PUT /api/admin/profiles/:user_id/admin - Grant or revoke admin status
pub async fn profile_set_admin(
    State(state): State<AppState>,
    AdminActor(admin): AdminActor,
    Path(user_id): Path<String>,
    payload: Result<Json<AdminFlagRequest>, JsonRejection>,
) -> ApiResult<Profile> {
    let Json(request) = payload?;

    // Keeps at least the acting admin in place
    if user_id == admin.user_id() && !request.is_admin {
        return Err(ApiError::conflict("Admins cannot revoke their own admin status"));
    }

    match state.store.set_admin(&user_id, request.is_admin).await? {
        Some(profile) => {
            tracing::info!("'{}' set is_admin={} for '{}'", admin.user_id(), request.is_admin, user_id);
            Ok(ApiResponse::keyed("profile", profile))
        }
        None => Err(ApiError::not_found(format!("Profile '{}' not found", user_id))),
    }
}

/// GET /api/admin/waitlist
pub async fn waitlist_list(State(state): State<AppState>, _admin: AdminActor) -> ApiResult<Vec<WaitlistEntry>> {
    Ok(ApiResponse::keyed("waitlist", state.store.list_waitlist().await?))
}

/// GET /api/admin/roles
pub async fn roles_list(State(state): State<AppState>, _admin: AdminActor) -> ApiResult<Vec<Role>> {
    Ok(ApiResponse::keyed("roles", state.store.list_roles().await?))
}
