// handlers/public/webhooks.rs - POST /api/webhooks/identity

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{secret_matches, WebhookEnvelope, WebhookError, WebhookEvent, WebhookOutcome};

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/**
 * POST /api/webhooks/identity - Sync users, organizations, memberships,
 * roles and waitlist entries from the identity provider
 *
 * Expected Input:
 * ```json
 * { "type": "organizationMembership.created", "data": { ... } }
 * ```
 *
 * Unknown event types are acknowledged with `ignored: true` so the provider
 * stops retrying them.
 */
pub async fn identity(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<WebhookEnvelope>, JsonRejection>,
) -> ApiResult<Value> {
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !secret_matches(&state.config.security.webhook_secret, provided) {
        tracing::warn!("Rejected webhook delivery with missing or wrong secret");
        return Err(ApiError::unauthorized("Invalid webhook secret"));
    }

    let Json(envelope) = payload?;
    let kind = envelope.kind.clone();

    let event = WebhookEvent::parse(envelope).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let outcome = event.apply(state.store.as_ref()).await.map_err(|e| match e {
        WebhookError::Database(db) => ApiError::from(db),
        other => ApiError::bad_request(other.to_string()),
    })?;

    tracing::info!("Webhook '{}' {:?}", kind, outcome);
    Ok(ApiResponse::with_fields(match outcome {
        WebhookOutcome::Applied => json!({ "type": kind }),
        WebhookOutcome::Ignored => json!({ "type": kind, "ignored": true }),
    }))
}
