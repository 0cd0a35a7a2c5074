mod common;

use axum::http::StatusCode;
use common::TestApp;
use uuid::Uuid;

#[tokio::test]
async fn unauthenticated_pages_redirect_to_sign_in() {
    let app = TestApp::new();
    let id = Uuid::new_v4();

    for path in [
        "/admin".to_string(),
        format!("/admin/projects/{}", id),
        "/projects".to_string(),
        format!("/projects/{}", id),
        format!("/projects/{}/onboarding", id),
    ] {
        let res = app.get(&path, None).await;
        assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT, "{}", path);
        let expected = format!("/sign-in?redirect_url={}", path.replace('/', "%2F"));
        assert_eq!(res.location.as_deref(), Some(expected.as_str()), "{}", path);
    }
}

#[tokio::test]
async fn unauthenticated_api_calls_get_401_json() {
    let app = TestApp::new();

    let res = app.get("/api/me", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["code"], "UNAUTHORIZED");

    let res = app.delete(&format!("/api/attachments/{}", Uuid::new_v4()), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_tokens_count_as_signed_out() {
    let app = TestApp::new();
    let res = app
        .send(
            axum::http::Method::GET,
            "/api/me",
            None,
            None,
            &[("authorization", "Bearer not-a-token")],
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_routes_need_no_session() {
    let app = TestApp::new();

    assert_eq!(app.get("/", None).await.status, StatusCode::OK);
    assert_eq!(app.get("/health", None).await.status, StatusCode::OK);

    let res = app.get("/sign-in?redirect_url=%2Fprojects", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["redirect_url"], "/projects");

    let res = app.get("/api/blog", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["posts"], serde_json::json!([]));
}

#[tokio::test]
async fn static_assets_skip_the_session_check() {
    let app = TestApp::new();
    // No redirect; the fallback answers instead
    let res = app.get("/favicon.ico", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.location, None);
}

#[tokio::test]
async fn sign_in_sends_signed_in_users_home() {
    let app = TestApp::new();
    app.admin("user_admin").await;
    app.client("user_client").await;

    let res = app.get("/sign-in", Some("user_admin")).await;
    assert_eq!(res.location.as_deref(), Some("/admin"));

    let res = app.get("/sign-in", Some("user_client")).await;
    assert_eq!(res.location.as_deref(), Some("/projects"));

    let res = app.get("/sign-in?redirect_url=https%3A%2F%2Fevil.example.com", Some("user_client")).await;
    assert_eq!(res.location.as_deref(), Some("/projects"));
}

#[tokio::test]
async fn clients_are_kept_out_of_the_admin_area() {
    let app = TestApp::new();
    app.client("user_client").await;

    let res = app.get("/admin", Some("user_client")).await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location.as_deref(), Some("/projects"));

    let res = app.get("/api/admin/profiles", Some("user_client")).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn first_sign_in_creates_the_profile() {
    let app = TestApp::new();

    let res = app.get("/api/me", Some("user_new")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["profile"]["user_id"], "user_new");
    assert_eq!(res.body["profile"]["is_admin"], false);
    assert_eq!(res.body["profile"]["email"], "user_new@example.com");
    assert_eq!(res.body["projects"], serde_json::json!([]));
}
