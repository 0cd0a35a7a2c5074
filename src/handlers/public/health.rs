// handlers/public/health.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - Service banner with the route map
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Client Portal API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "public": "/, /health, /sign-in, /api/blog[/:slug], /api/webhooks/identity",
                "pages": "/projects[/:id[/onboarding]] (session), /admin[/projects/:id] (admin)",
                "api": "/api/me, /api/projects/:id/*, /api/attachments/:id (session)",
                "admin": "/api/admin/* (admin)"
            }
        }
    }))
}

/// GET /health - Liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
