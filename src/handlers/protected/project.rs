// handlers/protected/project.rs - Project workspace APIs
//
// GET /api/projects/:id/kanban, GET|POST /api/projects/:id/secrets

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::{require_project_access, Action, Actor};
use crate::app::AppState;
use crate::database::models::{NewSecret, Secret};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::KanbanBoard;

/// GET /api/projects/:id/kanban - Tasks grouped by status column
pub async fn kanban(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> ApiResult<KanbanBoard> {
    require_project_access(&state, &actor, id, Action::View).await?;
    let tasks = state.store.list_tasks(id).await?;
    Ok(ApiResponse::keyed("board", KanbanBoard::from_tasks(tasks)))
}

/// GET /api/projects/:id/secrets
pub async fn secrets_list(State(state): State<AppState>, actor: Actor, Path(id): Path<Uuid>) -> ApiResult<Vec<Secret>> {
    require_project_access(&state, &actor, id, Action::View).await?;
    let secrets = state.store.list_secrets(id).await?;
    Ok(ApiResponse::keyed("secrets", secrets))
}

#[derive(Debug, Deserialize)]
pub struct SecretRequest {
    pub name: String,
    pub value: String,
}

/// POST /api/projects/:id/secrets - Hand a credential over to the team
pub async fn secret_create(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    payload: Result<Json<SecretRequest>, JsonRejection>,
) -> ApiResult<Secret> {
    require_project_access(&state, &actor, id, Action::Submit).await?;
    let Json(request) = payload?;

    let mut field_errors = HashMap::new();
    if request.name.trim().is_empty() {
        field_errors.insert("name".to_string(), "is required".to_string());
    }
    if request.value.is_empty() {
        field_errors.insert("value".to_string(), "is required".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Invalid secret", Some(field_errors)));
    }

    let secret = state
        .store
        .create_secret(NewSecret {
            project_id: id,
            name: request.name.trim().to_string(),
            value: request.value,
            created_by: actor.user_id().to_string(),
        })
        .await?;
    tracing::info!("'{}' added secret '{}' to project {}", actor.user_id(), secret.name, id);
    Ok(ApiResponse::created("secret", secret))
}
