// handlers/elevated/attachments.rs - DELETE /api/attachments/:id

use axum::extract::{Path, State};
use serde_json::Value;
use uuid::Uuid;

use crate::access::{require_attachment_access, Action, Actor};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// DELETE /api/attachments/:id - Admin only. Answers `{success: true}`, or
/// 401/403/404 from the access checks.
pub async fn delete(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> ApiResult<Value> {
    require_attachment_access(&state, &actor, id, Action::Delete).await?;

    // Gone between the check and the delete
    if !state.store.delete_attachment(id).await? {
        return Err(ApiError::not_found(format!("Attachment {} not found", id)));
    }

    tracing::info!("'{}' deleted attachment {}", actor.user_id(), id);
    Ok(ApiResponse::ok())
}
