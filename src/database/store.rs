use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::*;

/// Handle shared by every request through `AppState`
pub type SharedStore = Arc<dyn PortalStore>;

/// Per-entity reads and writes. Each method is a single query against the
/// backing store; upserts are keyed on the external identifier named in
/// their doc comment and are idempotent under redelivery.
#[async_trait]
pub trait PortalStore: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Profiles

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError>;
    /// Keyed on `user_id`. Leaves `is_admin` untouched.
    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile, DatabaseError>;
    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<Option<Profile>, DatabaseError>;
    async fn list_profiles(&self) -> Result<Vec<Profile>, DatabaseError>;

    // Organizations and the access relation

    /// Keyed on `external_id`.
    async fn upsert_organization(&self, org: NewOrganization) -> Result<Organization, DatabaseError>;
    async fn get_organization_by_external_id(&self, external_id: &str) -> Result<Option<Organization>, DatabaseError>;
    /// Keyed on `external_id`.
    async fn upsert_membership(&self, membership: NewMembership) -> Result<Membership, DatabaseError>;
    async fn delete_membership(&self, external_id: &str) -> Result<bool, DatabaseError>;
    async fn has_project_access(&self, user_id: &str, project_id: Uuid) -> Result<bool, DatabaseError>;

    // Roles and waitlist

    /// Keyed on `external_id`.
    async fn upsert_role(&self, role: NewRole) -> Result<Role, DatabaseError>;
    async fn list_roles(&self) -> Result<Vec<Role>, DatabaseError>;
    /// Keyed on `external_id`.
    async fn upsert_waitlist_entry(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, DatabaseError>;
    async fn list_waitlist(&self) -> Result<Vec<WaitlistEntry>, DatabaseError>;

    // Projects

    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError>;
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError>;
    async fn list_projects_for_user(&self, user_id: &str) -> Result<Vec<Project>, DatabaseError>;

    // Phases and kanban tasks

    async fn list_phases(&self, project_id: Uuid) -> Result<Vec<Phase>, DatabaseError>;
    async fn get_phase(&self, id: Uuid) -> Result<Option<Phase>, DatabaseError>;
    async fn create_phase(&self, phase: NewPhase) -> Result<Phase, DatabaseError>;
    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, DatabaseError>;
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError>;
    async fn create_task(&self, task: NewTask) -> Result<Task, DatabaseError>;
    async fn move_task(&self, id: Uuid, change: TaskMove) -> Result<Option<Task>, DatabaseError>;

    // Secrets and urls

    async fn list_secrets(&self, project_id: Uuid) -> Result<Vec<Secret>, DatabaseError>;
    async fn create_secret(&self, secret: NewSecret) -> Result<Secret, DatabaseError>;
    async fn delete_secret(&self, id: Uuid) -> Result<bool, DatabaseError>;
    async fn list_urls(&self, project_id: Uuid) -> Result<Vec<ProjectUrl>, DatabaseError>;
    async fn create_url(&self, url: NewProjectUrl) -> Result<ProjectUrl, DatabaseError>;
    async fn delete_url(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // Design

    async fn get_design(&self, project_id: Uuid) -> Result<Option<Design>, DatabaseError>;
    /// Keyed on `project_id`.
    async fn upsert_design(&self, project_id: Uuid, design: DesignInput) -> Result<Design, DatabaseError>;

    // Attachments

    async fn list_attachments(&self, project_id: Uuid) -> Result<Vec<Attachment>, DatabaseError>;
    async fn get_attachment(&self, id: Uuid) -> Result<Option<Attachment>, DatabaseError>;
    async fn create_attachment(&self, attachment: NewAttachment) -> Result<Attachment, DatabaseError>;
    async fn delete_attachment(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // Blog

    async fn list_blog_posts(&self, published_only: bool) -> Result<Vec<BlogPost>, DatabaseError>;
    async fn get_blog_post(&self, slug: &str) -> Result<Option<BlogPost>, DatabaseError>;
    /// Keyed on `slug`. `published_at` is stamped the first time a post is published.
    async fn upsert_blog_post(&self, post: NewBlogPost) -> Result<BlogPost, DatabaseError>;
}
