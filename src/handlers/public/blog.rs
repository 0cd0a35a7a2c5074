// handlers/public/blog.rs - GET /api/blog, GET /api/blog/:slug

use axum::extract::{Path, State};

use crate::access::{authorize, Action, MaybeActor, Resource};
use crate::app::AppState;
use crate::database::models::BlogPost;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/blog - Published posts, newest first. Admins also see drafts.
pub async fn list(State(state): State<AppState>, MaybeActor(actor): MaybeActor) -> ApiResult<Vec<BlogPost>> {
    authorize(&state, actor.as_ref(), Resource::Blog, Action::View)
        .await?
        .into_result()?;

    let include_drafts = actor.as_ref().map(|a| a.is_admin()).unwrap_or(false);
    let posts = state.store.list_blog_posts(!include_drafts).await?;
    Ok(ApiResponse::keyed("posts", posts))
}

/// GET /api/blog/:slug - One post; drafts are hidden from everyone but admins
pub async fn show(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Path(slug): Path<String>,
) -> ApiResult<BlogPost> {
    let is_admin = actor.as_ref().map(|a| a.is_admin()).unwrap_or(false);

    match state.store.get_blog_post(&slug).await? {
        Some(post) if post.published || is_admin => Ok(ApiResponse::keyed("post", post)),
        _ => Err(ApiError::not_found(format!("Post '{}' not found", slug))),
    }
}
