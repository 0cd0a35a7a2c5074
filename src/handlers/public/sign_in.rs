// handlers/public/sign_in.rs - GET /sign-in

use axum::{
    extract::Query,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::access::{gate, MaybeActor};

#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    pub redirect_url: Option<String>,
}

/// GET /sign-in - Landing page for the identity provider's widget
///
/// Signed-in callers are sent on: to `redirect_url` when it is a local path,
/// otherwise to the admin dashboard or project list depending on their role.
pub async fn sign_in_page(MaybeActor(actor): MaybeActor, Query(query): Query<SignInQuery>) -> Response {
    let return_to = query.redirect_url.filter(|url| is_local_path(url));

    match actor {
        Some(actor) => {
            let home = if actor.is_admin() { gate::ADMIN_HOME } else { gate::PROJECT_LIST };
            let target = return_to.unwrap_or_else(|| home.to_string());
            Redirect::temporary(&target).into_response()
        }
        None => Json(json!({
            "page": "sign_in",
            "redirect_url": return_to,
        }))
        .into_response(),
    }
}

/// Only same-origin absolute paths; rejects `//host` and full urls
fn is_local_path(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.contains('\\')
}
