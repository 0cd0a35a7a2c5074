// access/guards.rs - Request-level guards built on the authorization predicate

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::Session;
use crate::database::models::{NewProfile, Profile};
use crate::database::{DatabaseError, PortalStore};
use crate::error::ApiError;
use crate::middleware::CurrentSession;

use super::policy::{Action, ActorFacts, Authorizer, Decision, Resource};

/// Signed-in caller with their portal profile
#[derive(Debug, Clone)]
pub struct Actor {
    pub session: Session,
    pub profile: Profile,
}

impl Actor {
    pub fn user_id(&self) -> &str {
        &self.profile.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.is_admin
    }

    fn identity(&self) -> (&str, ActorFacts) {
        (self.user_id(), ActorFacts { is_admin: self.is_admin() })
    }
}

/// Loads the caller's profile, creating it on first sign-in
pub async fn resolve_profile(store: &dyn PortalStore, session: &Session) -> Result<Profile, DatabaseError> {
    if let Some(profile) = store.get_profile(&session.user_id).await? {
        return Ok(profile);
    }

    tracing::info!("Creating profile for first sign-in of '{}'", session.user_id);
    store
        .upsert_profile(NewProfile {
            user_id: session.user_id.clone(),
            email: session.email.clone(),
            full_name: session.name.clone(),
            avatar_url: None,
        })
        .await
}

/// `require_user`: rejects with 401 when the request carries no session
#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match MaybeActor::from_request_parts(parts, state).await? {
            MaybeActor(Some(actor)) => Ok(actor),
            MaybeActor(None) => Err(ApiError::unauthorized("Authentication required")),
        }
    }
}

/// The actor when a session is present; pages use this so the gate can redirect
#[derive(Debug, Clone)]
pub struct MaybeActor(pub Option<Actor>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<CurrentSession>()
            .and_then(|current| current.0.clone());

        let Some(session) = session else {
            return Ok(MaybeActor(None));
        };

        let profile = resolve_profile(state.store.as_ref(), &session).await?;
        Ok(MaybeActor(Some(Actor { session, profile })))
    }
}

/// `require_admin`: 401 without a session, 403 for non-admins
#[derive(Debug, Clone)]
pub struct AdminActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for AdminActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let actor = Actor::from_request_parts(parts, state).await?;
        authorize(state, Some(&actor), Resource::AdminArea, Action::View)
            .await?
            .into_result()?;
        Ok(AdminActor(actor))
    }
}

/// Run the predicate for an optional actor against the store
pub async fn authorize(
    state: &AppState,
    actor: Option<&Actor>,
    resource: Resource,
    action: Action,
) -> Result<Decision, ApiError> {
    let decision = Authorizer::new(state.store.as_ref())
        .authorize(actor.map(Actor::identity), resource, action)
        .await?;
    Ok(decision)
}

/// `require_project_access`: 403 without the access relation, 404 for admins on
/// missing projects
pub async fn require_project_access(
    state: &AppState,
    actor: &Actor,
    project_id: Uuid,
    action: Action,
) -> Result<(), ApiError> {
    authorize(state, Some(actor), Resource::Project(project_id), action)
        .await?
        .into_result()
}

/// Same checks, resolved through the project that owns the attachment
pub async fn require_attachment_access(
    state: &AppState,
    actor: &Actor,
    attachment_id: Uuid,
    action: Action,
) -> Result<(), ApiError> {
    authorize(state, Some(actor), Resource::Attachment(attachment_id), action)
        .await?
        .into_result()
}
