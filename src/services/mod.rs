// services/mod.rs - Domain services shared by handlers

pub mod design;
pub mod kanban;
pub mod webhook;

pub use design::DesignService;
pub use kanban::KanbanBoard;
pub use webhook::{secret_matches, WebhookEnvelope, WebhookError, WebhookEvent, WebhookOutcome};
