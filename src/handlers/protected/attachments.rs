// handlers/protected/attachments.rs - Project files
//
// GET|POST /api/projects/:id/attachments, GET /api/attachments/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::{require_attachment_access, require_project_access, Action, Actor};
use crate::app::AppState;
use crate::database::models::{Attachment, NewAttachment};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/projects/:id/attachments
pub async fn list(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> ApiResult<Vec<Attachment>> {
    require_project_access(&state, &actor, id, Action::View).await?;
    let attachments = state.store.list_attachments(id).await?;
    Ok(ApiResponse::keyed("attachments", attachments))
}

/// Metadata for a file already uploaded to object storage
#[derive(Debug, Deserialize)]
pub struct AttachmentRequest {
    pub file_name: String,
    pub file_url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
}

/// POST /api/projects/:id/attachments - Record an uploaded file
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    payload: Result<Json<AttachmentRequest>, JsonRejection>,
) -> ApiResult<Attachment> {
    require_project_access(&state, &actor, id, Action::Submit).await?;
    let Json(request) = payload?;

    if request.file_name.trim().is_empty() {
        return Err(ApiError::bad_request("file_name is required"));
    }
    match url::Url::parse(&request.file_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => return Err(ApiError::bad_request("file_url must be an http(s) url")),
    }
    if request.size_bytes.map(|size| size < 0).unwrap_or(false) {
        return Err(ApiError::bad_request("size_bytes must not be negative"));
    }

    let attachment = state
        .store
        .create_attachment(NewAttachment {
            project_id: id,
            file_name: request.file_name.trim().to_string(),
            file_url: request.file_url,
            content_type: request.content_type,
            size_bytes: request.size_bytes,
            uploaded_by: actor.user_id().to_string(),
        })
        .await?;
    Ok(ApiResponse::created("attachment", attachment))
}

/// GET /api/attachments/:id - Access follows the owning project
pub async fn show(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> ApiResult<Attachment> {
    require_attachment_access(&state, &actor, id, Action::View).await?;

    match state.store.get_attachment(id).await? {
        Some(attachment) => Ok(ApiResponse::keyed("attachment", attachment)),
        None => Err(ApiError::not_found(format!("Attachment {} not found", id))),
    }
}
