// handlers/elevated/pages.rs - Admin page models
//
// GET /admin, GET /admin/projects/:id

use axum::{
    extract::{Path, State},
    response::Response,
};
use futures::try_join;
use serde_json::json;
use uuid::Uuid;

use crate::access::{Decision, MaybeActor, PageRoute};
use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::page;
use crate::services::KanbanBoard;

/// GET /admin - Dashboard over every project, profile and waitlist entry
pub async fn admin_home_page(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
) -> Result<Response, ApiError> {
    let route = PageRoute::AdminHome;
    let decision = page::authorize_page(&state, actor.as_ref(), route).await?;
    if !decision.is_allowed() {
        return Ok(page::redirect(&state, route, decision));
    }

    let store = state.store.as_ref();
    let (projects, profiles, waitlist) = try_join!(store.list_projects(), store.list_profiles(), store.list_waitlist())?;

    Ok(page::respond(&state, route, decision, None, || {
        json!({
            "page": "admin",
            "projects": projects,
            "profiles": profiles,
            "waitlist": waitlist,
        })
    }))
}

/// GET /admin/projects/:id - Everything about one project, regardless of onboarding
pub async fn admin_project_page(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let route = PageRoute::AdminProject(id);
    let decision = page::authorize_page(&state, actor.as_ref(), route).await?;
    if !decision.is_allowed() {
        return Ok(page::redirect(&state, route, decision));
    }

    let store = state.store.as_ref();
    let (project, design, phases, tasks, secrets, urls, attachments) = try_join!(
        store.get_project(id),
        store.get_design(id),
        store.list_phases(id),
        store.list_tasks(id),
        store.list_secrets(id),
        store.list_urls(id),
        store.list_attachments(id),
    )?;
    let Some(project) = project else {
        return Ok(page::redirect(&state, route, Decision::NotFound));
    };

    Ok(page::respond(&state, route, decision, None, || {
        json!({
            "page": "admin_project",
            "project": project,
            "design": design,
            "phases": phases,
            "board": KanbanBoard::from_tasks(tasks),
            "secrets": secrets,
            "urls": urls,
            "attachments": attachments,
        })
    }))
}
