// handlers/elevated/content.rs - Project content managed by admins
//
// POST /api/admin/projects, phases, tasks and urls; PATCH /api/admin/tasks/:id;
// DELETE /api/admin/urls/:id and /api/admin/secrets/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::access::{require_project_access, Action, Actor, AdminActor};
use crate::app::AppState;
use crate::database::models::{
    NewPhase, NewProject, NewProjectUrl, NewTask, Phase, Project, ProjectStatus, ProjectUrl, Task, TaskMove,
    TaskStatus,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// A task may only sit in a phase of its own project
async fn ensure_phase_in_project(state: &AppState, phase_id: Uuid, project_id: Uuid) -> Result<(), ApiError> {
    match state.store.get_phase(phase_id).await? {
        Some(phase) if phase.project_id == project_id => Ok(()),
        _ => Err(ApiError::bad_request(format!(
            "Phase {} does not belong to project {}",
            phase_id, project_id
        ))),
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub organization_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
}

/// POST /api/admin/projects - Create a project for an organization
pub async fn project_create(
    State(state): State<AppState>,
    AdminActor(admin): AdminActor,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> ApiResult<Project> {
    let Json(request) = payload?;
    let project = state
        .store
        .create_project(NewProject {
            organization_id: request.organization_id,
            name: required("name", &request.name)?,
            description: request.description,
            status: request.status,
        })
        .await?;
    tracing::info!("'{}' created project {} ({})", admin.user_id(), project.id, project.name);
    Ok(ApiResponse::created("project", project))
}

#[derive(Debug, Deserialize)]
pub struct PhaseRequest {
    pub name: String,
    #[serde(default)]
    pub position: i32,
}

/// POST /api/admin/projects/:id/phases
pub async fn phase_create(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    payload: Result<Json<PhaseRequest>, JsonRejection>,
) -> ApiResult<Phase> {
    require_project_access(&state, &actor, id, Action::Manage).await?;
    let Json(request) = payload?;

    let phase = state
        .store
        .create_phase(NewPhase {
            project_id: id,
            name: required("name", &request.name)?,
            position: request.position,
        })
        .await?;
    Ok(ApiResponse::created("phase", phase))
}

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub phase_id: Option<Uuid>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub position: i32,
}

/// POST /api/admin/projects/:id/tasks - New kanban card
pub async fn task_create(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<Task> {
    require_project_access(&state, &actor, id, Action::Manage).await?;
    let Json(request) = payload?;
    if let Some(phase_id) = request.phase_id {
        ensure_phase_in_project(&state, phase_id, id).await?;
    }

    let task = state
        .store
        .create_task(NewTask {
            project_id: id,
            phase_id: request.phase_id,
            title: required("title", &request.title)?,
            description: request.description,
            status: request.status,
            position: request.position,
        })
        .await?;
    Ok(ApiResponse::created("task", task))
}

/// PATCH /api/admin/tasks/:id - Move a card between columns, phases or positions
pub async fn task_move(
    State(state): State<AppState>,
    _admin: AdminActor,
    Path(id): Path<Uuid>,
    payload: Result<Json<TaskMove>, JsonRejection>,
) -> ApiResult<Task> {
    let Json(change) = payload?;
    let task = state
        .store
        .get_task(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Task {} not found", id)))?;
    if let Some(phase_id) = change.phase_id {
        ensure_phase_in_project(&state, phase_id, task.project_id).await?;
    }

    match state.store.move_task(id, change).await? {
        Some(task) => Ok(ApiResponse::keyed("task", task)),
        None => Err(ApiError::not_found(format!("Task {} not found", id))),
    }
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub label: String,
    pub url: String,
}

/// POST /api/admin/projects/:id/urls - Staging, production or design links
pub async fn url_create(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> ApiResult<ProjectUrl> {
    require_project_access(&state, &actor, id, Action::Manage).await?;
    let Json(request) = payload?;

    let url = match url::Url::parse(request.url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed.to_string(),
        _ => return Err(ApiError::bad_request("url must be an http(s) url")),
    };

    let created = state
        .store
        .create_url(NewProjectUrl {
            project_id: id,
            label: required("label", &request.label)?,
            url,
        })
        .await?;
    Ok(ApiResponse::created("url", created))
}

/// DELETE /api/admin/urls/:id
pub async fn url_delete(State(state): State<AppState>, _admin: AdminActor, Path(id): Path<Uuid>) -> ApiResult<Value> {
    if !state.store.delete_url(id).await? {
        return Err(ApiError::not_found(format!("Url {} not found", id)));
    }
    Ok(ApiResponse::ok())
}

/// DELETE /api/admin/secrets/:id
pub async fn secret_delete(
    State(state): State<AppState>,
    AdminActor(admin): AdminActor,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    if !state.store.delete_secret(id).await? {
        return Err(ApiError::not_found(format!("Secret {} not found", id)));
    }
    tracing::info!("'{}' deleted secret {}", admin.user_id(), id);
    Ok(ApiResponse::ok())
}
