mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn project_without_design_goes_to_onboarding() {
    let app = TestApp::new();
    let project = app.client_project("user_client").await;
    let project_path = format!("/projects/{}", project.id);
    let onboarding_path = format!("/projects/{}/onboarding", project.id);

    let res = app.get(&project_path, Some("user_client")).await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location.as_deref(), Some(onboarding_path.as_str()));

    let res = app.get(&onboarding_path, Some("user_client")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["page"], "onboarding");
    assert_eq!(res.body["design"], serde_json::Value::Null);
}

#[tokio::test]
async fn completing_onboarding_flips_the_redirect_pair() {
    let app = TestApp::new();
    let project = app.client_project("user_client").await;
    let project_path = format!("/projects/{}", project.id);
    let onboarding_path = format!("/projects/{}/onboarding", project.id);

    let res = app
        .post(
            &format!("/api{}/onboarding", project_path),
            Some("user_client"),
            json!({"theme_id": "dawn", "primary_color": "#112233", "corner_radius": 12}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["design"]["onboarding_completed"], true);

    let res = app.get(&project_path, Some("user_client")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["page"], "project");
    assert_eq!(res.body["design"]["theme_id"], "dawn");
    assert_eq!(res.body["board"]["columns"].as_array().map(Vec::len), Some(4));

    let res = app.get(&onboarding_path, Some("user_client")).await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.location.as_deref(), Some(project_path.as_str()));

    // Onboarding is a one-shot submission
    let res = app
        .post(&format!("/api{}/onboarding", project_path), Some("user_client"), json!({}))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn design_saved_with_flag_false_keeps_onboarding_state() {
    let app = TestApp::new();
    app.admin("user_admin").await;
    let project = app.client_project("user_client").await;

    let res = app
        .post(
            &format!("/api/admin/projects/{}/design", project.id),
            Some("user_admin"),
            json!({"theme_id": "dusk", "onboarding_completed": false}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get(&format!("/projects/{}", project.id), Some("user_client")).await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    let res = app.get(&format!("/projects/{}/onboarding", project.id), Some("user_client")).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn outsiders_are_sent_back_to_their_list() {
    let app = TestApp::new();
    let project = app.client_project("user_client").await;
    app.client("user_outsider").await;

    for path in [format!("/projects/{}", project.id), format!("/projects/{}/onboarding", project.id)] {
        let res = app.get(&path, Some("user_outsider")).await;
        assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT, "{}", path);
        assert_eq!(res.location.as_deref(), Some("/projects"), "{}", path);
    }

    let res = app.get(&format!("/api/projects/{}/kanban", project.id), Some("user_outsider")).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .post(&format!("/api/projects/{}/onboarding", project.id), Some("user_outsider"), json!({}))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    // The member's own view is untouched
    let res = app.get(&format!("/projects/{}/onboarding", project.id), Some("user_client")).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn missing_projects_redirect_to_the_list_page() {
    let app = TestApp::new();
    app.admin("user_admin").await;
    let missing = Uuid::new_v4();

    let res = app.get(&format!("/admin/projects/{}", missing), Some("user_admin")).await;
    assert_eq!(res.location.as_deref(), Some("/admin"));

    let res = app.get(&format!("/projects/{}", missing), Some("user_admin")).await;
    assert_eq!(res.location.as_deref(), Some("/projects"));
}

#[tokio::test]
async fn admins_see_projects_regardless_of_onboarding() {
    let app = TestApp::new();
    app.admin("user_admin").await;
    let project = app.client_project("user_client").await;

    let res = app.get(&format!("/admin/projects/{}", project.id), Some("user_admin")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["page"], "admin_project");
    assert_eq!(res.body["project"]["name"], "Website relaunch");

    let res = app.get("/admin", Some("user_admin")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["projects"].as_array().map(Vec::len), Some(1));

    let res = app.get("/projects", Some("user_client")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["projects"][0]["id"], project.id.to_string());
}
