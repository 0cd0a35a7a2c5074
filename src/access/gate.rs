// access/gate.rs - Access-and-redirect gate for page routes
//
// Rules 1-4 (session, admin, access, existence) come from the authorization
// `Decision`; rules 5-6 read the per-project `ProjectState`.

use axum::http::StatusCode;
use uuid::Uuid;

use crate::database::models::Design;
use crate::middleware::sign_in_url;

use super::policy::{Action, Decision, DenyReason, Resource};

pub const ADMIN_HOME: &str = "/admin";
pub const PROJECT_LIST: &str = "/projects";

/// Per-project onboarding state machine keyed on `Design.onboarding_completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectState {
    Onboarding,
    Active,
}

impl ProjectState {
    pub const ALL: [ProjectState; 2] = [ProjectState::Onboarding, ProjectState::Active];

    pub fn from_design(design: Option<&Design>) -> Self {
        match design {
            Some(design) if design.onboarding_completed => ProjectState::Active,
            _ => ProjectState::Onboarding,
        }
    }
}

/// Page routes guarded by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRoute {
    AdminHome,
    AdminProject(Uuid),
    ProjectList,
    Project(Uuid),
    Onboarding(Uuid),
}

impl PageRoute {
    pub fn path(&self) -> String {
        match self {
            PageRoute::AdminHome => ADMIN_HOME.to_string(),
            PageRoute::AdminProject(id) => format!("/admin/projects/{}", id),
            PageRoute::ProjectList => PROJECT_LIST.to_string(),
            PageRoute::Project(id) => format!("/projects/{}", id),
            PageRoute::Onboarding(id) => format!("/projects/{}/onboarding", id),
        }
    }

    /// Resource/action pair the predicate evaluates for this page
    pub fn resource(&self) -> (Resource, Action) {
        match *self {
            PageRoute::AdminHome => (Resource::AdminArea, Action::View),
            PageRoute::AdminProject(id) => (Resource::Project(id), Action::Manage),
            PageRoute::ProjectList => (Resource::Portal, Action::View),
            PageRoute::Project(id) | PageRoute::Onboarding(id) => (Resource::Project(id), Action::View),
        }
    }

    /// Where a missing target sends the caller
    fn list_path(&self) -> &'static str {
        match self {
            PageRoute::AdminHome | PageRoute::AdminProject(_) => ADMIN_HOME,
            _ => PROJECT_LIST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Render,
    Redirect(String),
    Reject(StatusCode),
}

/// Decide render or redirect. First matching rule wins; the gate never
/// touches the store.
///
/// `state` is only consulted for the client project and onboarding pages and
/// may be `None` elsewhere.
pub fn decide(
    route: PageRoute,
    decision: Decision,
    state: Option<ProjectState>,
    sign_in_path: &str,
) -> GateOutcome {
    match decision {
        Decision::Deny(DenyReason::Unauthenticated) => {
            return GateOutcome::Redirect(sign_in_url(sign_in_path, &route.path()));
        }
        Decision::Deny(DenyReason::NotAdmin) | Decision::Deny(DenyReason::NoProjectAccess) => {
            return GateOutcome::Redirect(PROJECT_LIST.to_string());
        }
        Decision::NotFound => return GateOutcome::Redirect(route.list_path().to_string()),
        Decision::Allow => {}
    }

    match (route, state) {
        (PageRoute::Project(id), Some(ProjectState::Onboarding)) => {
            GateOutcome::Redirect(PageRoute::Onboarding(id).path())
        }
        (PageRoute::Onboarding(id), Some(ProjectState::Active)) => GateOutcome::Redirect(PageRoute::Project(id).path()),
        (PageRoute::Project(_) | PageRoute::Onboarding(_), None) => {
            // Allowed project pages always arrive with a state; missing one is a caller bug
            tracing::error!("Gate for {:?} called without project state", route);
            GateOutcome::Reject(StatusCode::INTERNAL_SERVER_ERROR)
        }
        _ => {
            tracing::debug!("Gate renders {}", route.path());
            GateOutcome::Render
        }
    }
}
