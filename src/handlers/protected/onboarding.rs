// handlers/protected/onboarding.rs - POST /api/projects/:id/onboarding

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::access::{require_project_access, Action, Actor};
use crate::app::AppState;
use crate::database::models::{Design, DesignInput};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::DesignService;

/**
 * POST /api/projects/:id/onboarding - Submit the onboarding questionnaire
 *
 * Stores the chosen design and marks onboarding complete. A project that
 * already finished onboarding answers 409; later changes go through the
 * admin design endpoint.
 */
pub async fn submit(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    payload: Result<Json<DesignInput>, JsonRejection>,
) -> ApiResult<Design> {
    require_project_access(&state, &actor, id, Action::Submit).await?;
    let Json(input) = payload?;

    let design = DesignService::new(state.store.as_ref())
        .complete_onboarding(id, input)
        .await?;
    tracing::info!("'{}' completed onboarding for project {}", actor.user_id(), id);
    Ok(ApiResponse::keyed("design", design))
}
