// handlers/elevated/blog.rs - PUT /api/admin/blog/:slug

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::access::{authorize, Action, Actor, Resource};
use crate::app::AppState;
use crate::database::models::{BlogPost, NewBlogPost};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct BlogPostRequest {
    pub title: String,
    pub excerpt: Option<String>,
    /// Editor document; stored untouched
    pub content: Value,
    #[serde(default)]
    pub published: bool,
}

/// Lowercase letters, digits and single hyphens between them
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 120
        && slug.split('-').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// PUT /api/admin/blog/:slug - Create or replace a post; publishing stamps `published_at` once
pub async fn upsert(
    State(state): State<AppState>,
    actor: Actor,
    Path(slug): Path<String>,
    payload: Result<Json<BlogPostRequest>, JsonRejection>,
) -> ApiResult<BlogPost> {
    authorize(&state, Some(&actor), Resource::Blog, Action::Manage)
        .await?
        .into_result()?;
    let Json(request) = payload?;

    if !is_valid_slug(&slug) {
        return Err(ApiError::bad_request("slug must be lowercase words joined by hyphens"));
    }
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }

    let post = state
        .store
        .upsert_blog_post(NewBlogPost {
            slug,
            title: request.title.trim().to_string(),
            excerpt: request.excerpt,
            content: request.content,
            published: request.published,
        })
        .await?;
    tracing::info!("'{}' saved post '{}' (published={})", actor.user_id(), post.slug, post.published);
    Ok(ApiResponse::keyed("post", post))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_kebab_case() {
        assert!(is_valid_slug("launch-day-2024"));
        assert!(!is_valid_slug("Launch-Day"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug(""));
    }
}
