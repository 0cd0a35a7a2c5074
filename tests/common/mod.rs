#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use portal_api::app::{app, AppState};
use portal_api::auth::{issue_session_token, Claims};
use portal_api::config::AppConfig;
use portal_api::database::models::{NewMembership, NewOrganization, NewProfile, NewProject, Organization, Project};
use portal_api::database::{MemoryStore, PortalStore, SharedStore};

pub const SESSION_SECRET: &str = "test-session-secret";
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";

// ---------------------------------------------------------------------------
// In-process router over MemoryStore
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.security.session_secret = SESSION_SECRET.to_string();
        config.security.webhook_secret = WEBHOOK_SECRET.to_string();
        config.api.enable_request_logging = false;

        let store = Arc::new(MemoryStore::new());
        let shared: SharedStore = store.clone();
        let router = app(AppState::new(shared, config));
        Self { store, router }
    }

    pub fn token(&self, user_id: &str) -> String {
        let claims = Claims::new(user_id, Some(format!("{}@example.com", user_id)), 1);
        issue_session_token(&claims, SESSION_SECRET).expect("token")
    }

    pub async fn get(&self, path: &str, user: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, user, None, &[]).await
    }

    pub async fn post(&self, path: &str, user: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, path, user, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str, user: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, path, user, None, &[]).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        user: Option<&str>,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };

        TestResponse { status, location, body }
    }

    // Fixtures

    pub async fn client(&self, user_id: &str) {
        self.store
            .upsert_profile(NewProfile {
                user_id: user_id.to_string(),
                email: Some(format!("{}@example.com", user_id)),
                ..Default::default()
            })
            .await
            .expect("profile");
    }

    pub async fn admin(&self, user_id: &str) {
        self.client(user_id).await;
        self.store.set_admin(user_id, true).await.expect("admin flag");
    }

    pub async fn organization(&self, external_id: &str) -> Organization {
        self.store
            .upsert_organization(NewOrganization {
                external_id: external_id.to_string(),
                name: format!("Org {}", external_id),
                slug: Some(external_id.to_string()),
            })
            .await
            .expect("organization")
    }

    pub async fn member(&self, user_id: &str, org: &Organization) {
        self.client(user_id).await;
        self.store
            .upsert_membership(NewMembership {
                external_id: format!("orgmem_{}_{}", org.external_id, user_id),
                organization_id: org.id,
                user_id: user_id.to_string(),
                role: Some("org:member".to_string()),
            })
            .await
            .expect("membership");
    }

    pub async fn project(&self, org: &Organization, name: &str) -> Project {
        self.store
            .create_project(NewProject {
                organization_id: org.id,
                name: name.to_string(),
                description: None,
                status: Default::default(),
            })
            .await
            .expect("project")
    }

    /// Organization with one client member and one project
    pub async fn client_project(&self, user_id: &str) -> Project {
        let org = self.organization(&format!("org_{}", Uuid::new_v4().simple())).await;
        self.member(user_id, &org).await;
        self.project(&org, "Website relaunch").await
    }
}

// ---------------------------------------------------------------------------
// Spawned binary, for end-to-end liveness
// ---------------------------------------------------------------------------

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_portal-api"));
        cmd.arg("serve")
            .env("APP_ENV", "development")
            .env("PORTAL_STORE", "memory")
            .env("PORTAL_HOST", "127.0.0.1")
            .env("PORTAL_PORT", port.to_string())
            .env("SESSION_JWT_SECRET", SESSION_SECRET)
            .env("WEBHOOK_SECRET", WEBHOOK_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
