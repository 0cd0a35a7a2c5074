// handlers/protected/me.rs - GET /api/me

use axum::extract::State;
use serde_json::{json, Value};

use crate::access::Actor;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/me - The caller's profile and the projects they can open
pub async fn me(State(state): State<AppState>, actor: Actor) -> ApiResult<Value> {
    let projects = if actor.is_admin() {
        state.store.list_projects().await?
    } else {
        state.store.list_projects_for_user(actor.user_id()).await?
    };

    Ok(ApiResponse::with_fields(json!({
        "profile": actor.profile,
        "projects": projects,
    })))
}
