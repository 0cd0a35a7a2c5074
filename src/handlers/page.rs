// handlers/page.rs - Shared plumbing for gated page routes
//
// Pages authorize first, read their entities concurrently, then let the gate
// pick between the JSON page model and a redirect.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};

use crate::access::{authorize, decide, Actor, Decision, GateOutcome, PageRoute, ProjectState};
use crate::app::AppState;
use crate::error::ApiError;

/// Run the predicate for the page's resource
pub async fn authorize_page(state: &AppState, actor: Option<&Actor>, route: PageRoute) -> Result<Decision, ApiError> {
    let (resource, action) = route.resource();
    authorize(state, actor, resource, action).await
}

/// Turn the gate's outcome into a response; `model` is only built on render
pub fn respond(
    state: &AppState,
    route: PageRoute,
    decision: Decision,
    project_state: Option<ProjectState>,
    model: impl FnOnce() -> Value,
) -> Response {
    let outcome = decide(route, decision, project_state, &state.config.security.sign_in_path);
    match outcome {
        GateOutcome::Render => Json(model()).into_response(),
        GateOutcome::Redirect(location) => {
            tracing::debug!("Gate redirects {} to {}", route.path(), location);
            Redirect::temporary(&location).into_response()
        }
        GateOutcome::Reject(status) => reject(status),
    }
}

/// Short-circuit for denied or missing targets; the gate never needs a model
pub fn redirect(state: &AppState, route: PageRoute, decision: Decision) -> Response {
    respond(state, route, decision, None, || Value::Null)
}

fn reject(status: StatusCode) -> Response {
    let message = status.canonical_reason().unwrap_or("Request rejected");
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}
