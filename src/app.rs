use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::SharedStore;
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::session_middleware;

/// Per-process handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(public_routes())
        .merge(page_routes())
        .merge(protected_routes())
        .merge(elevated_routes())
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config));
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/sign-in", get(public::sign_in_page))
        .route("/api/blog", get(public::blog_list))
        .route("/api/blog/:slug", get(public::blog_show))
        .route("/api/webhooks/identity", post(public::identity_webhook))
}

/// Gated page models; redirects come from the access gate
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(elevated::admin_home_page))
        .route("/admin/projects/:id", get(elevated::admin_project_page))
        .route("/projects", get(protected::project_list_page))
        .route("/projects/:id", get(protected::project_page))
        .route("/projects/:id/onboarding", get(protected::onboarding_page))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/me", get(protected::me))
        .route("/api/projects/:id/onboarding", post(protected::onboarding_submit))
        .route("/api/projects/:id/kanban", get(protected::kanban_board))
        .route(
            "/api/projects/:id/secrets",
            get(protected::secrets_list).post(protected::secret_create),
        )
        .route(
            "/api/projects/:id/attachments",
            get(protected::attachments_list).post(protected::attachment_create),
        )
        .route(
            "/api/attachments/:id",
            get(protected::attachment_show).delete(elevated::attachment_delete),
        )
}

fn elevated_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/projects", post(elevated::project_create))
        .route(
            "/api/admin/projects/:id/design",
            get(elevated::design_get).post(elevated::design_upsert),
        )
        .route("/api/admin/projects/:id/phases", post(elevated::phase_create))
        .route("/api/admin/projects/:id/tasks", post(elevated::task_create))
        .route("/api/admin/tasks/:id", patch(elevated::task_move))
        .route("/api/admin/projects/:id/urls", post(elevated::url_create))
        .route("/api/admin/urls/:id", delete(elevated::url_delete))
        .route("/api/admin/secrets/:id", delete(elevated::secret_delete))
        .route("/api/admin/profiles", get(elevated::profiles_list))
        .route("/api/admin/profiles/:user_id/admin", put(elevated::profile_set_admin))
        .route("/api/admin/waitlist", get(elevated::waitlist_list))
        .route("/api/admin/roles", get(elevated::roles_list))
        .route("/api/admin/blog/:slug", put(elevated::blog_upsert))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
