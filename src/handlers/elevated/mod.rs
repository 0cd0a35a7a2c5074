// handlers/elevated/mod.rs - Elevated handlers (admin profile required)
//
// The back office: dashboard pages, project content, designs, people and
// blog posts. Handlers take `AdminActor`, which answers 401 without a
// session and 403 for non-admins before any store access.
//
// Security Level: Session + `profiles.is_admin`
// Route Prefix: /admin/*, /api/admin/*, DELETE /api/attachments/:id

pub mod attachments;
pub mod blog;
pub mod content;
pub mod design;
pub mod pages;
pub mod people;

pub use attachments::delete as attachment_delete;
pub use blog::upsert as blog_upsert;
pub use content::{
    phase_create, project_create, secret_delete, task_create, task_move, url_create, url_delete,
};
pub use design::{get as design_get, upsert as design_upsert};
pub use pages::{admin_home_page, admin_project_page};
pub use people::{profile_set_admin, profiles_list, roles_list, waitlist_list};
