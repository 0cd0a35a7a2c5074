// handlers/protected/pages.rs - Client page models
//
// GET /projects, GET /projects/:id, GET /projects/:id/onboarding

use axum::{
    extract::{Path, State},
    response::Response,
};
use futures::try_join;
use serde_json::json;
use uuid::Uuid;

use crate::access::{Decision, MaybeActor, PageRoute, ProjectState};
use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::page;
use crate::services::KanbanBoard;

/// GET /projects - Projects the caller can open
pub async fn project_list_page(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
) -> Result<Response, ApiError> {
    let route = PageRoute::ProjectList;
    let decision = page::authorize_page(&state, actor.as_ref(), route).await?;
    let Some(actor) = actor.filter(|_| decision.is_allowed()) else {
        return Ok(page::redirect(&state, route, decision));
    };

    let projects = if actor.is_admin() {
        state.store.list_projects().await?
    } else {
        state.store.list_projects_for_user(actor.user_id()).await?
    };

    Ok(page::respond(&state, route, decision, None, || {
        json!({
            "page": "projects",
            "profile": actor.profile,
            "projects": projects,
        })
    }))
}

/**
 * GET /projects/:id - Project workspace
 *
 * Renders only once onboarding is complete; before that the gate sends the
 * caller to `/projects/:id/onboarding`.
 */
pub async fn project_page(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let route = PageRoute::Project(id);
    let decision = page::authorize_page(&state, actor.as_ref(), route).await?;
    if !decision.is_allowed() {
        return Ok(page::redirect(&state, route, decision));
    }

    let store = state.store.as_ref();
    let (project, design, phases, tasks, urls, attachments) = try_join!(
        store.get_project(id),
        store.get_design(id),
        store.list_phases(id),
        store.list_tasks(id),
        store.list_urls(id),
        store.list_attachments(id),
    )?;

    // Deleted between the access check and the reads
    let Some(project) = project else {
        return Ok(page::redirect(&state, route, Decision::NotFound));
    };

    let project_state = ProjectState::from_design(design.as_ref());
    Ok(page::respond(&state, route, decision, Some(project_state), || {
        json!({
            "page": "project",
            "project": project,
            "design": design,
            "phases": phases,
            "board": KanbanBoard::from_tasks(tasks),
            "urls": urls,
            "attachments": attachments,
        })
    }))
}

/// GET /projects/:id/onboarding - Design questionnaire; leaves once completed
pub async fn onboarding_page(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let route = PageRoute::Onboarding(id);
    let decision = page::authorize_page(&state, actor.as_ref(), route).await?;
    if !decision.is_allowed() {
        return Ok(page::redirect(&state, route, decision));
    }

    let store = state.store.as_ref();
    let (project, design) = try_join!(store.get_project(id), store.get_design(id))?;
    let Some(project) = project else {
        return Ok(page::redirect(&state, route, Decision::NotFound));
    };

    let project_state = ProjectState::from_design(design.as_ref());
    Ok(page::respond(&state, route, decision, Some(project_state), || {
        json!({
            "page": "onboarding",
            "project": project,
            "design": design,
        })
    }))
}
