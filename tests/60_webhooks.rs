mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, WEBHOOK_SECRET};
use portal_api::database::PortalStore;
use serde_json::{json, Value};

async fn deliver(app: &TestApp, event: Value) -> common::TestResponse {
    app.send(
        Method::POST,
        "/api/webhooks/identity",
        None,
        Some(event),
        &[("x-webhook-secret", WEBHOOK_SECRET)],
    )
    .await
}

#[tokio::test]
async fn deliveries_need_the_shared_secret() {
    let app = TestApp::new();
    let event = json!({"type": "role.created", "data": {"id": "role_1", "key": "org:admin", "name": "Admin"}});

    let res = app
        .send(Method::POST, "/api/webhooks/identity", None, Some(event.clone()), &[("x-webhook-secret", "nope")])
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.post("/api/webhooks/identity", None, event).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(app.store.list_roles().await.unwrap().is_empty());
}

#[tokio::test]
async fn redelivery_does_not_duplicate_rows() {
    let app = TestApp::new();
    let events = [
        json!({"type": "user.created", "data": {
            "id": "user_1",
            "email_addresses": [{"email_address": "ada@example.com"}],
            "first_name": "Ada"
        }}),
        json!({"type": "role.created", "data": {"id": "role_1", "key": "org:member", "name": "Member"}}),
        json!({"type": "waitlistEntry.created", "data": {
            "id": "wl_1", "email_address": "grace@example.com", "status": "pending"
        }}),
    ];

    for _ in 0..2 {
        for event in &events {
            let res = deliver(&app, event.clone()).await;
            assert_eq!(res.status, StatusCode::OK, "{}", res.body);
            assert_eq!(res.body["success"], true);
        }
    }

    assert_eq!(app.store.list_profiles().await.unwrap().len(), 1);
    assert_eq!(app.store.list_roles().await.unwrap().len(), 1);
    assert_eq!(app.store.list_waitlist().await.unwrap().len(), 1);

    let res = deliver(
        &app,
        json!({"type": "waitlistEntry.updated", "data": {
            "id": "wl_1", "email_address": "grace@example.com", "status": "invited"
        }}),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let waitlist = app.store.list_waitlist().await.unwrap();
    assert_eq!(waitlist.len(), 1);
    assert_eq!(serde_json::to_value(waitlist[0].status).unwrap(), "invited");
}

#[tokio::test]
async fn memberships_grant_and_revoke_project_access() {
    let app = TestApp::new();
    let org = app.organization("org_acme").await;
    let project = app.project(&org, "Storefront").await;
    let kanban = format!("/api/projects/{}/kanban", project.id);

    assert_eq!(app.get(&kanban, Some("user_1")).await.status, StatusCode::FORBIDDEN);

    let membership = json!({"type": "organizationMembership.created", "data": {
        "id": "orgmem_1",
        "role": "org:member",
        "organization": {"id": "org_acme", "name": "Acme", "slug": "acme"},
        "public_user_data": {"user_id": "user_1"}
    }});
    deliver(&app, membership.clone()).await;
    deliver(&app, membership).await;
    assert_eq!(app.get(&kanban, Some("user_1")).await.status, StatusCode::OK);

    let res = deliver(
        &app,
        json!({"type": "organizationMembership.deleted", "data": {"id": "orgmem_1"}}),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.get(&kanban, Some("user_1")).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_events_are_acknowledged_and_ignored() {
    let app = TestApp::new();
    let res = deliver(&app, json!({"type": "session.created", "data": {"id": "sess_1"}})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["ignored"], true);
}

#[tokio::test]
async fn malformed_payloads_are_bad_requests() {
    let app = TestApp::new();
    let res = deliver(&app, json!({"type": "user.created", "data": {"email_addresses": []}})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}
