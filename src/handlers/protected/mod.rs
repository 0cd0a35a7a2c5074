// handlers/protected/mod.rs - Protected handlers (session required)
//
// Client-facing pages and the project APIs behind them. Every handler
// resolves the `Actor` and checks the access relation before reading.
//
// Security Level: Session + project access
// Route Prefix: /projects/*, /api/me, /api/projects/:id/*, /api/attachments/:id

pub mod attachments;
pub mod me;
pub mod onboarding;
pub mod pages;
pub mod project;

pub use attachments::{create as attachment_create, list as attachments_list, show as attachment_show};
pub use me::me;
pub use onboarding::submit as onboarding_submit;
pub use pages::{onboarding_page, project_list_page, project_page};
pub use project::{kanban as kanban_board, secret_create, secrets_list};
