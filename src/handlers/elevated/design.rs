// handlers/elevated/design.rs - GET|POST /api/admin/projects/:id/design

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::access::AdminActor;
use crate::app::AppState;
use crate::database::models::{Design, DesignInput};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::DesignService;

/// GET /api/admin/projects/:id/design - `design` is null until first saved
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminActor,
    Path(id): Path<Uuid>,
) -> ApiResult<Option<Design>> {
    let design = DesignService::new(state.store.as_ref()).fetch(id).await?;
    Ok(ApiResponse::keyed("design", design))
}

/**
 * POST /api/admin/projects/:id/design - Upsert the project's design
 *
 * Expected Input:
 * ```json
 * {
 *   "theme_id": "dawn",
 *   "primary_color": "#1a2b3c",   // #rgb or #rrggbb
 *   "accent_color": "#fc0",
 *   "heading_font": "Inter",
 *   "body_font": "Source Serif",
 *   "corner_radius": 8,            // 0..=64
 *   "onboarding_completed": true   // omitted keeps the stored value
 * }
 * ```
 *
 * Returns `{ "success": true, "design": { ... } }`.
 */
pub async fn upsert(
    State(state): State<AppState>,
    AdminActor(admin): AdminActor,
    Path(id): Path<Uuid>,
    payload: Result<Json<DesignInput>, JsonRejection>,
) -> ApiResult<Design> {
    let Json(input) = payload?;
    let design = DesignService::new(state.store.as_ref()).save(id, input).await?;
    tracing::info!("'{}' updated design of project {}", admin.user_id(), id);
    Ok(ApiResponse::keyed("design", design))
}
