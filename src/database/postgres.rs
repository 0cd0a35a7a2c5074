use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::*;
use crate::database::store::PortalStore;

/// `PortalStore` over PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(manager: &DatabaseManager) -> Self {
        Self {
            pool: manager.pool().clone(),
        }
    }
}

#[async_trait]
impl PortalStore for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile, DatabaseError> {
        let row = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (user_id, email, full_name, avatar_url)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                email = EXCLUDED.email,
                full_name = EXCLUDED.full_name,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = NOW()
             RETURNING *",
        )
        .bind(&profile.user_id)
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(&profile.avatar_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<Option<Profile>, DatabaseError> {
        let row = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET is_admin = $2, updated_at = NOW() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(is_admin)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, DatabaseError> {
        let rows = sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn upsert_organization(&self, org: NewOrganization) -> Result<Organization, DatabaseError> {
        let row = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (external_id, name, slug)
             VALUES ($1, $2, $3)
             ON CONFLICT (external_id) DO UPDATE SET
                name = EXCLUDED.name,
                slug = EXCLUDED.slug,
                updated_at = NOW()
             RETURNING *",
        )
        .bind(&org.external_id)
        .bind(&org.name)
        .bind(&org.slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_organization_by_external_id(&self, external_id: &str) -> Result<Option<Organization>, DatabaseError> {
        let row = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert_membership(&self, membership: NewMembership) -> Result<Membership, DatabaseError> {
        let row = sqlx::query_as::<_, Membership>(
            "INSERT INTO memberships (external_id, organization_id, user_id, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (external_id) DO UPDATE SET
                organization_id = EXCLUDED.organization_id,
                user_id = EXCLUDED.user_id,
                role = EXCLUDED.role,
                updated_at = NOW()
             RETURNING *",
        )
        .bind(&membership.external_id)
        .bind(membership.organization_id)
        .bind(&membership.user_id)
        .bind(&membership.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_membership(&self, external_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM memberships WHERE external_id = $1")
            .bind(external_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn has_project_access(&self, user_id: &str, project_id: Uuid) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM projects p
                JOIN memberships m ON m.organization_id = p.organization_id
                WHERE p.id = $1 AND m.user_id = $2
             )",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn upsert_role(&self, role: NewRole) -> Result<Role, DatabaseError> {
        let row = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (external_id, key, name, description)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (external_id) DO UPDATE SET
                key = EXCLUDED.key,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                updated_at = NOW()
             RETURNING *",
        )
        .bind(&role.external_id)
        .bind(&role.key)
        .bind(&role.name)
        .bind(&role.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DatabaseError> {
        let rows = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn upsert_waitlist_entry(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, DatabaseError> {
        let row = sqlx::query_as::<_, WaitlistEntry>(
            "INSERT INTO waitlist_entries (external_id, email_address, status)
             VALUES ($1, $2, $3)
             ON CONFLICT (external_id) DO UPDATE SET
                email_address = EXCLUDED.email_address,
                status = EXCLUDED.status,
                updated_at = NOW()
             RETURNING *",
        )
        .bind(&entry.external_id)
        .bind(&entry.email_address)
        .bind(entry.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_waitlist(&self) -> Result<Vec<WaitlistEntry>, DatabaseError> {
        let rows = sqlx::query_as::<_, WaitlistEntry>("SELECT * FROM waitlist_entries ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let row = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (organization_id, name, description, status)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(project.organization_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let row = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let rows = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_projects_for_user(&self, user_id: &str) -> Result<Vec<Project>, DatabaseError> {
        let rows = sqlx::query_as::<_, Project>(
            "SELECT p.* FROM projects p
             WHERE EXISTS (
                SELECT 1 FROM memberships m
                WHERE m.organization_id = p.organization_id AND m.user_id = $1
             )
             ORDER BY p.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_phases(&self, project_id: Uuid) -> Result<Vec<Phase>, DatabaseError> {
        let rows = sqlx::query_as::<_, Phase>(
            "SELECT * FROM phases WHERE project_id = $1 ORDER BY position, created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_phase(&self, id: Uuid) -> Result<Option<Phase>, DatabaseError> {
        let row = sqlx::query_as::<_, Phase>("SELECT * FROM phases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_phase(&self, phase: NewPhase) -> Result<Phase, DatabaseError> {
        let row = sqlx::query_as::<_, Phase>(
            "INSERT INTO phases (project_id, name, position) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(phase.project_id)
        .bind(&phase.name)
        .bind(phase.position)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, DatabaseError> {
        let rows = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE project_id = $1 ORDER BY position, created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        let row = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, DatabaseError> {
        let row = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (project_id, phase_id, title, description, status, position)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(task.project_id)
        .bind(task.phase_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.position)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn move_task(&self, id: Uuid, change: TaskMove) -> Result<Option<Task>, DatabaseError> {
        let row = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                status = COALESCE($2, status),
                phase_id = COALESCE($3, phase_id),
                position = COALESCE($4, position),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(change.status)
        .bind(change.phase_id)
        .bind(change.position)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_secrets(&self, project_id: Uuid) -> Result<Vec<Secret>, DatabaseError> {
        let rows = sqlx::query_as::<_, Secret>(
            "SELECT * FROM secrets WHERE project_id = $1 ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_secret(&self, secret: NewSecret) -> Result<Secret, DatabaseError> {
        let row = sqlx::query_as::<_, Secret>(
            "INSERT INTO secrets (project_id, name, value, created_by) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(secret.project_id)
        .bind(&secret.name)
        .bind(&secret.value)
        .bind(&secret.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_secret(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM secrets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_urls(&self, project_id: Uuid) -> Result<Vec<ProjectUrl>, DatabaseError> {
        let rows = sqlx::query_as::<_, ProjectUrl>(
            "SELECT * FROM project_urls WHERE project_id = $1 ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_url(&self, url: NewProjectUrl) -> Result<ProjectUrl, DatabaseError> {
        let row = sqlx::query_as::<_, ProjectUrl>(
            "INSERT INTO project_urls (project_id, label, url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(url.project_id)
        .bind(&url.label)
        .bind(&url.url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_url(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM project_urls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_design(&self, project_id: Uuid) -> Result<Option<Design>, DatabaseError> {
        let row = sqlx::query_as::<_, Design>("SELECT * FROM designs WHERE project_id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert_design(&self, project_id: Uuid, design: DesignInput) -> Result<Design, DatabaseError> {
        let row = sqlx::query_as::<_, Design>(
            "INSERT INTO designs (
                project_id, theme_id, primary_color, accent_color,
                heading_font, body_font, corner_radius, onboarding_completed
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, FALSE))
             ON CONFLICT (project_id) DO UPDATE SET
                theme_id = EXCLUDED.theme_id,
                primary_color = EXCLUDED.primary_color,
                accent_color = EXCLUDED.accent_color,
                heading_font = EXCLUDED.heading_font,
                body_font = EXCLUDED.body_font,
                corner_radius = EXCLUDED.corner_radius,
                onboarding_completed = COALESCE($8, designs.onboarding_completed),
                updated_at = NOW()
             RETURNING *",
        )
        .bind(project_id)
        .bind(&design.theme_id)
        .bind(&design.primary_color)
        .bind(&design.accent_color)
        .bind(&design.heading_font)
        .bind(&design.body_font)
        .bind(design.corner_radius)
        .bind(design.onboarding_completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_attachments(&self, project_id: Uuid) -> Result<Vec<Attachment>, DatabaseError> {
        let rows = sqlx::query_as::<_, Attachment>(
            "SELECT * FROM attachments WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_attachment(&self, id: Uuid) -> Result<Option<Attachment>, DatabaseError> {
        let row = sqlx::query_as::<_, Attachment>("SELECT * FROM attachments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_attachment(&self, attachment: NewAttachment) -> Result<Attachment, DatabaseError> {
        let row = sqlx::query_as::<_, Attachment>(
            "INSERT INTO attachments (project_id, file_name, file_url, content_type, size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(attachment.project_id)
        .bind(&attachment.file_name)
        .bind(&attachment.file_url)
        .bind(&attachment.content_type)
        .bind(attachment.size_bytes)
        .bind(&attachment.uploaded_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_attachment(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_blog_posts(&self, published_only: bool) -> Result<Vec<BlogPost>, DatabaseError> {
        let rows = sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts
             WHERE published OR NOT $1
             ORDER BY published_at DESC NULLS LAST, created_at DESC",
        )
        .bind(published_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_blog_post(&self, slug: &str) -> Result<Option<BlogPost>, DatabaseError> {
        let row = sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert_blog_post(&self, post: NewBlogPost) -> Result<BlogPost, DatabaseError> {
        let row = sqlx::query_as::<_, BlogPost>(
            "INSERT INTO blog_posts (slug, title, excerpt, content, published, published_at)
             VALUES ($1, $2, $3, $4, $5, CASE WHEN $5 THEN NOW() END)
             ON CONFLICT (slug) DO UPDATE SET
                title = EXCLUDED.title,
                excerpt = EXCLUDED.excerpt,
                content = EXCLUDED.content,
                published = EXCLUDED.published,
                published_at = CASE
                    WHEN EXCLUDED.published THEN COALESCE(blog_posts.published_at, NOW())
                    ELSE blog_posts.published_at
                END,
                updated_at = NOW()
             RETURNING *",
        )
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.published)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
