// access/mod.rs - Who may see what, and where pages send them otherwise

pub mod gate;
pub mod guards;
pub mod policy;

pub use gate::{decide, GateOutcome, PageRoute, ProjectState};
pub use guards::{
    authorize, require_attachment_access, require_project_access, resolve_profile, Actor, AdminActor, MaybeActor,
};
pub use policy::{Action, ActorFacts, Authorizer, Decision, DenyReason, Resource};
