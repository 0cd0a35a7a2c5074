// middleware/session.rs - Session extraction and early sign-in redirect

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::app::AppState;
use crate::auth::{verify_session_token, Session};
use crate::error::ApiError;

use super::route_matcher::{classify, is_api_path, RouteClass};

/// Cookie the identity provider sets for same-site sessions
pub const SESSION_COOKIE: &str = "__session";

/// Session slot every non-excluded request carries after the middleware
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Session>);

/// Authenticates the request and enforces the matcher's protected class.
///
/// Protected pages without a session redirect to sign-in with a
/// `redirect_url`; protected API calls get 401.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let class = classify(&path);
    if class == RouteClass::Excluded {
        return next.run(request).await;
    }

    let session = extract_token(request.headers()).and_then(|token| {
        match verify_session_token(&token, &state.config.security.session_secret) {
            Ok(claims) => Some(Session::from(claims)),
            Err(e) => {
                tracing::debug!("Ignoring session token on {}: {}", path, e);
                None
            }
        }
    });

    if class == RouteClass::Protected && session.is_none() {
        if is_api_path(&path) {
            return ApiError::unauthorized("Authentication required").into_response();
        }
        let target = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or(path);
        return Redirect::temporary(&sign_in_url(&state.config.security.sign_in_path, &target)).into_response();
    }

    request.extensions_mut().insert(CurrentSession(session));
    next.run(request).await
}

/// Sign-in location that returns the user to `return_to` afterwards
pub fn sign_in_url(sign_in_path: &str, return_to: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect_url", return_to)
        .finish();
    format!("{}?{}", sign_in_path, query)
}

/// Bearer header first, then the session cookie
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn sign_in_url_encodes_return_path() {
        assert_eq!(
            sign_in_url("/sign-in", "/projects/1?tab=files"),
            "/sign-in?redirect_url=%2Fprojects%2F1%3Ftab%3Dfiles"
        );
    }

    #[test]
    fn token_from_bearer_or_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; __session=cookie-token"));
        assert_eq!(extract_token(&headers).as_deref(), Some("cookie-token"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer header-token"));
        assert_eq!(extract_token(&headers).as_deref(), Some("header-token"));
    }

    #[test]
    fn malformed_headers_yield_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("__session="));
        assert_eq!(extract_token(&headers), None);
    }
}
