// access/policy.rs - Authorization predicate over {resource, actor, action}
//
// Every guard and the page gate go through `evaluate`, which checks in order:
// authentication, admin requirement, project access, existence.

use uuid::Uuid;

use crate::database::{DatabaseError, PortalStore};
use crate::error::ApiError;

/// Closed set of things an actor can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Signed-in client area: profile, project list
    Portal,
    /// The admin back office as a whole
    AdminArea,
    Project(Uuid),
    Attachment(Uuid),
    Blog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read
    View,
    /// Client contributions: onboarding answers, secrets, uploads
    Submit,
    /// Back-office edits: design, phases, tasks, urls, posts
    Manage,
    Delete,
}

/// What the predicate needs to know about the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorFacts {
    pub is_admin: bool,
}

/// What the predicate needs to know about the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceFacts {
    pub exists: bool,
    pub has_access: bool,
}

impl ResourceFacts {
    /// Facts for resources with no existence or membership semantics
    pub const OPEN: ResourceFacts = ResourceFacts { exists: true, has_access: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    NotAdmin,
    NoProjectAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
    NotFound,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Map to the API error taxonomy: 401, 403, 404
    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(ApiError::unauthorized("Authentication required")),
            Decision::Deny(DenyReason::NotAdmin) => Err(ApiError::forbidden("Admin access required")),
            Decision::Deny(DenyReason::NoProjectAccess) => {
                Err(ApiError::forbidden("You do not have access to this project"))
            }
            Decision::NotFound => Err(ApiError::not_found("Resource not found")),
        }
    }
}

/// Whether the pair needs a signed-in actor at all
fn requires_session(resource: Resource, action: Action) -> bool {
    !matches!((resource, action), (Resource::Blog, Action::View))
}

fn requires_admin(resource: Resource, action: Action) -> bool {
    match resource {
        Resource::Portal => false,
        Resource::AdminArea => true,
        Resource::Blog => action != Action::View,
        Resource::Project(_) | Resource::Attachment(_) => matches!(action, Action::Manage | Action::Delete),
    }
}

fn requires_project_access(resource: Resource) -> bool {
    matches!(resource, Resource::Project(_) | Resource::Attachment(_))
}

/// Pure decision over already-resolved facts. First failing rule wins.
pub fn evaluate(
    actor: Option<ActorFacts>,
    resource: Resource,
    action: Action,
    facts: ResourceFacts,
) -> Decision {
    if !requires_session(resource, action) {
        return if facts.exists { Decision::Allow } else { Decision::NotFound };
    }

    let Some(actor) = actor else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    if requires_admin(resource, action) && !actor.is_admin {
        return Decision::Deny(DenyReason::NotAdmin);
    }

    if requires_project_access(resource) && !actor.is_admin && !facts.has_access {
        return Decision::Deny(DenyReason::NoProjectAccess);
    }

    if !facts.exists {
        return Decision::NotFound;
    }

    Decision::Allow
}

/// Resolves facts from the store and runs [`evaluate`]
pub struct Authorizer<'a> {
    store: &'a dyn PortalStore,
}

impl<'a> Authorizer<'a> {
    pub fn new(store: &'a dyn PortalStore) -> Self {
        Self { store }
    }

    pub async fn authorize(
        &self,
        actor: Option<(&str, ActorFacts)>,
        resource: Resource,
        action: Action,
    ) -> Result<Decision, DatabaseError> {
        // Nothing to look up when the session or admin rules already decide
        let early = evaluate(actor.map(|(_, facts)| facts), resource, action, ResourceFacts {
            exists: true,
            has_access: true,
        });
        if !early.is_allowed() {
            return Ok(early);
        }

        let facts = match (resource, actor) {
            (Resource::Project(project_id), Some((user_id, actor_facts))) => {
                self.project_facts(user_id, actor_facts, project_id).await?
            }
            (Resource::Attachment(attachment_id), Some((user_id, actor_facts))) => {
                match self.store.get_attachment(attachment_id).await? {
                    Some(attachment) => {
                        self.project_facts(user_id, actor_facts, attachment.project_id).await?
                    }
                    // Missing attachments read as forbidden to clients, not found to admins
                    None => ResourceFacts { exists: false, has_access: actor_facts.is_admin },
                }
            }
            _ => ResourceFacts::OPEN,
        };

        let decision = evaluate(actor.map(|(_, facts)| facts), resource, action, facts);
        if let (Decision::Deny(reason), Some((user_id, _))) = (decision, actor) {
            tracing::warn!("Denied {:?} on {:?} for '{}': {:?}", action, resource, user_id, reason);
        }
        Ok(decision)
    }

    async fn project_facts(
        &self,
        user_id: &str,
        actor: ActorFacts,
        project_id: Uuid,
    ) -> Result<ResourceFacts, DatabaseError> {
        if actor.is_admin {
            let exists = self.store.get_project(project_id).await?.is_some();
            return Ok(ResourceFacts { exists, has_access: true });
        }
        // The relation only exists for existing projects, so access implies existence
        let has_access = self.store.has_project_access(user_id, project_id).await?;
        Ok(ResourceFacts { exists: has_access, has_access })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: Option<ActorFacts> = Some(ActorFacts { is_admin: false });
    const ADMIN: Option<ActorFacts> = Some(ActorFacts { is_admin: true });
    const MISSING: ResourceFacts = ResourceFacts { exists: false, has_access: false };
    const FOREIGN: ResourceFacts = ResourceFacts { exists: true, has_access: false };

    #[test]
    fn unauthenticated_is_denied_before_anything_else() {
        let project = Resource::Project(Uuid::new_v4());
        assert_eq!(
            evaluate(None, project, Action::View, MISSING),
            Decision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            evaluate(None, Resource::AdminArea, Action::View, ResourceFacts::OPEN),
            Decision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn public_blog_reads_need_no_session() {
        assert_eq!(evaluate(None, Resource::Blog, Action::View, ResourceFacts::OPEN), Decision::Allow);
        assert_eq!(
            evaluate(CLIENT, Resource::Blog, Action::Manage, ResourceFacts::OPEN),
            Decision::Deny(DenyReason::NotAdmin)
        );
    }

    #[test]
    fn admin_rule_precedes_access_and_existence() {
        let project = Resource::Project(Uuid::new_v4());
        assert_eq!(evaluate(CLIENT, project, Action::Manage, MISSING), Decision::Deny(DenyReason::NotAdmin));
        assert_eq!(evaluate(CLIENT, Resource::AdminArea, Action::View, ResourceFacts::OPEN), Decision::Deny(DenyReason::NotAdmin));
    }

    #[test]
    fn clients_need_the_access_relation() {
        let project = Resource::Project(Uuid::new_v4());
        assert_eq!(evaluate(CLIENT, project, Action::View, FOREIGN), Decision::Deny(DenyReason::NoProjectAccess));
        assert_eq!(evaluate(CLIENT, project, Action::View, MISSING), Decision::Deny(DenyReason::NoProjectAccess));
        assert_eq!(evaluate(CLIENT, project, Action::Submit, ResourceFacts::OPEN), Decision::Allow);
    }

    #[test]
    fn admins_see_missing_projects_as_not_found() {
        let project = Resource::Project(Uuid::new_v4());
        assert_eq!(evaluate(ADMIN, project, Action::View, MISSING), Decision::NotFound);
        assert_eq!(evaluate(ADMIN, project, Action::Delete, FOREIGN), Decision::Allow);
    }

    #[test]
    fn decisions_map_to_status_codes() {
        use axum::http::StatusCode;
        let code = |d: Decision| d.into_result().unwrap_err().status_code();
        assert_eq!(code(Decision::Deny(DenyReason::Unauthenticated)), StatusCode::UNAUTHORIZED);
        assert_eq!(code(Decision::Deny(DenyReason::NotAdmin)), StatusCode::FORBIDDEN);
        assert_eq!(code(Decision::Deny(DenyReason::NoProjectAccess)), StatusCode::FORBIDDEN);
        assert_eq!(code(Decision::NotFound), StatusCode::NOT_FOUND);
        assert!(Decision::Allow.into_result().is_ok());
    }
}
