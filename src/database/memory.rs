use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::*;
use crate::database::store::PortalStore;

/// In-process `PortalStore` for tests and local development.
///
/// Mirrors the Postgres behavior that the rest of the crate depends on:
/// upserts keyed on the same conflict columns, `is_admin` preserved across
/// profile upserts, and the access relation derived from memberships.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    profiles: HashMap<String, Profile>,
    organizations: HashMap<Uuid, Organization>,
    memberships: HashMap<String, Membership>,
    roles: HashMap<String, Role>,
    waitlist: HashMap<String, WaitlistEntry>,
    projects: HashMap<Uuid, Project>,
    phases: HashMap<Uuid, Phase>,
    tasks: HashMap<Uuid, Task>,
    secrets: HashMap<Uuid, Secret>,
    urls: HashMap<Uuid, ProjectUrl>,
    designs: HashMap<Uuid, Design>,
    attachments: HashMap<Uuid, Attachment>,
    blog_posts: HashMap<String, BlogPost>,
}

impl Tables {
    fn require_project(&self, id: Uuid) -> Result<(), DatabaseError> {
        if self.projects.contains_key(&id) {
            Ok(())
        } else {
            Err(DatabaseError::MissingReference(format!("project {} does not exist", id)))
        }
    }

    fn require_phase(&self, id: Uuid) -> Result<(), DatabaseError> {
        if self.phases.contains_key(&id) {
            Ok(())
        } else {
            Err(DatabaseError::MissingReference(format!("phase {} does not exist", id)))
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by_key(|row| key(row));
    rows
}

#[async_trait]
impl PortalStore for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError> {
        Ok(self.inner.read().await.profiles.get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile, DatabaseError> {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        let row = tables
            .profiles
            .entry(profile.user_id.clone())
            .and_modify(|existing| {
                existing.email = profile.email.clone();
                existing.full_name = profile.full_name.clone();
                existing.avatar_url = profile.avatar_url.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| Profile {
                id: Uuid::new_v4(),
                user_id: profile.user_id.clone(),
                email: profile.email.clone(),
                full_name: profile.full_name.clone(),
                avatar_url: profile.avatar_url.clone(),
                is_admin: false,
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<Option<Profile>, DatabaseError> {
        let mut tables = self.inner.write().await;
        Ok(tables.profiles.get_mut(user_id).map(|profile| {
            profile.is_admin = is_admin;
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, DatabaseError> {
        let rows = self.inner.read().await.profiles.values().cloned().collect();
        Ok(sorted_by(rows, |p: &Profile| p.created_at))
    }

    async fn upsert_organization(&self, org: NewOrganization) -> Result<Organization, DatabaseError> {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        if let Some(existing) = tables
            .organizations
            .values_mut()
            .find(|o| o.external_id == org.external_id)
        {
            existing.name = org.name;
            existing.slug = org.slug;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let row = Organization {
            id: Uuid::new_v4(),
            external_id: org.external_id,
            name: org.name,
            slug: org.slug,
            created_at: now,
            updated_at: now,
        };
        tables.organizations.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_organization_by_external_id(&self, external_id: &str) -> Result<Option<Organization>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .organizations
            .values()
            .find(|o| o.external_id == external_id)
            .cloned())
    }

    async fn upsert_membership(&self, membership: NewMembership) -> Result<Membership, DatabaseError> {
        let mut tables = self.inner.write().await;
        if !tables.organizations.contains_key(&membership.organization_id) {
            return Err(DatabaseError::MissingReference(format!(
                "organization {} does not exist",
                membership.organization_id
            )));
        }
        let now = Utc::now();
        let row = tables
            .memberships
            .entry(membership.external_id.clone())
            .and_modify(|existing| {
                existing.organization_id = membership.organization_id;
                existing.user_id = membership.user_id.clone();
                existing.role = membership.role.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| Membership {
                id: Uuid::new_v4(),
                external_id: membership.external_id.clone(),
                organization_id: membership.organization_id,
                user_id: membership.user_id.clone(),
                role: membership.role.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn delete_membership(&self, external_id: &str) -> Result<bool, DatabaseError> {
        Ok(self.inner.write().await.memberships.remove(external_id).is_some())
    }

    async fn has_project_access(&self, user_id: &str, project_id: Uuid) -> Result<bool, DatabaseError> {
        let tables = self.inner.read().await;
        let Some(project) = tables.projects.get(&project_id) else {
            return Ok(false);
        };
        Ok(tables
            .memberships
            .values()
            .any(|m| m.user_id == user_id && m.organization_id == project.organization_id))
    }

    async fn upsert_role(&self, role: NewRole) -> Result<Role, DatabaseError> {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        let row = tables
            .roles
            .entry(role.external_id.clone())
            .and_modify(|existing| {
                existing.key = role.key.clone();
                existing.name = role.name.clone();
                existing.description = role.description.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| Role {
                id: Uuid::new_v4(),
                external_id: role.external_id.clone(),
                key: role.key.clone(),
                name: role.name.clone(),
                description: role.description.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DatabaseError> {
        let rows = self.inner.read().await.roles.values().cloned().collect();
        Ok(sorted_by(rows, |r: &Role| r.name.clone()))
    }

    async fn upsert_waitlist_entry(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, DatabaseError> {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        let row = tables
            .waitlist
            .entry(entry.external_id.clone())
            .and_modify(|existing| {
                existing.email_address = entry.email_address.clone();
                existing.status = entry.status;
                existing.updated_at = now;
            })
            .or_insert_with(|| WaitlistEntry {
                id: Uuid::new_v4(),
                external_id: entry.external_id.clone(),
                email_address: entry.email_address.clone(),
                status: entry.status,
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn list_waitlist(&self) -> Result<Vec<WaitlistEntry>, DatabaseError> {
        let rows = self.inner.read().await.waitlist.values().cloned().collect();
        Ok(sorted_by(rows, |w: &WaitlistEntry| std::cmp::Reverse(w.created_at)))
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let mut tables = self.inner.write().await;
        if !tables.organizations.contains_key(&project.organization_id) {
            return Err(DatabaseError::MissingReference(format!(
                "organization {} does not exist",
                project.organization_id
            )));
        }
        let now = Utc::now();
        let row = Project {
            id: Uuid::new_v4(),
            organization_id: project.organization_id,
            name: project.name,
            description: project.description,
            status: project.status,
            created_at: now,
            updated_at: now,
        };
        tables.projects.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        Ok(self.inner.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let rows = self.inner.read().await.projects.values().cloned().collect();
        Ok(sorted_by(rows, |p: &Project| std::cmp::Reverse(p.created_at)))
    }

    async fn list_projects_for_user(&self, user_id: &str) -> Result<Vec<Project>, DatabaseError> {
        let tables = self.inner.read().await;
        let rows = tables
            .projects
            .values()
            .filter(|p| {
                tables
                    .memberships
                    .values()
                    .any(|m| m.user_id == user_id && m.organization_id == p.organization_id)
            })
            .cloned()
            .collect();
        Ok(sorted_by(rows, |p: &Project| std::cmp::Reverse(p.created_at)))
    }

    async fn list_phases(&self, project_id: Uuid) -> Result<Vec<Phase>, DatabaseError> {
        let rows = self
            .inner
            .read()
            .await
            .phases
            .values()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |p: &Phase| (p.position, p.created_at)))
    }

    async fn get_phase(&self, id: Uuid) -> Result<Option<Phase>, DatabaseError> {
        Ok(self.inner.read().await.phases.get(&id).cloned())
    }

    async fn create_phase(&self, phase: NewPhase) -> Result<Phase, DatabaseError> {
        let mut tables = self.inner.write().await;
        tables.require_project(phase.project_id)?;
        let row = Phase {
            id: Uuid::new_v4(),
            project_id: phase.project_id,
            name: phase.name,
            position: phase.position,
            created_at: Utc::now(),
        };
        tables.phases.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, DatabaseError> {
        let rows = self
            .inner
            .read()
            .await
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |t: &Task| (t.position, t.created_at)))
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, DatabaseError> {
        let mut tables = self.inner.write().await;
        tables.require_project(task.project_id)?;
        if let Some(phase_id) = task.phase_id {
            tables.require_phase(phase_id)?;
        }
        let now = Utc::now();
        let row = Task {
            id: Uuid::new_v4(),
            project_id: task.project_id,
            phase_id: task.phase_id,
            title: task.title,
            description: task.description,
            status: task.status,
            position: task.position,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(row.id, row.clone());
        Ok(row)
    }

    async fn move_task(&self, id: Uuid, change: TaskMove) -> Result<Option<Task>, DatabaseError> {
        let mut tables = self.inner.write().await;
        if let Some(phase_id) = change.phase_id {
            tables.require_phase(phase_id)?;
        }
        Ok(tables.tasks.get_mut(&id).map(|task| {
            if let Some(status) = change.status {
                task.status = status;
            }
            if let Some(phase_id) = change.phase_id {
                task.phase_id = Some(phase_id);
            }
            if let Some(position) = change.position {
                task.position = position;
            }
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn list_secrets(&self, project_id: Uuid) -> Result<Vec<Secret>, DatabaseError> {
        let rows = self
            .inner
            .read()
            .await
            .secrets
            .values()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |s: &Secret| s.created_at))
    }

    async fn create_secret(&self, secret: NewSecret) -> Result<Secret, DatabaseError> {
        let row = Secret {
            id: Uuid::new_v4(),
            project_id: secret.project_id,
            name: secret.name,
            value: secret.value,
            created_by: secret.created_by,
            created_at: Utc::now(),
        };
        self.inner.write().await.secrets.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_secret(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.inner.write().await.secrets.remove(&id).is_some())
    }

    async fn list_urls(&self, project_id: Uuid) -> Result<Vec<ProjectUrl>, DatabaseError> {
        let rows = self
            .inner
            .read()
            .await
            .urls
            .values()
            .filter(|u| u.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |u: &ProjectUrl| u.created_at))
    }

    async fn create_url(&self, url: NewProjectUrl) -> Result<ProjectUrl, DatabaseError> {
        let row = ProjectUrl {
            id: Uuid::new_v4(),
            project_id: url.project_id,
            label: url.label,
            url: url.url,
            created_at: Utc::now(),
        };
        self.inner.write().await.urls.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_url(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.inner.write().await.urls.remove(&id).is_some())
    }

    async fn get_design(&self, project_id: Uuid) -> Result<Option<Design>, DatabaseError> {
        Ok(self.inner.read().await.designs.get(&project_id).cloned())
    }

    async fn upsert_design(&self, project_id: Uuid, design: DesignInput) -> Result<Design, DatabaseError> {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        let row = tables
            .designs
            .entry(project_id)
            .and_modify(|existing| {
                existing.theme_id = design.theme_id.clone();
                existing.primary_color = design.primary_color.clone();
                existing.accent_color = design.accent_color.clone();
                existing.heading_font = design.heading_font.clone();
                existing.body_font = design.body_font.clone();
                existing.corner_radius = design.corner_radius;
                if let Some(completed) = design.onboarding_completed {
                    existing.onboarding_completed = completed;
                }
                existing.updated_at = now;
            })
            .or_insert_with(|| Design {
                id: Uuid::new_v4(),
                project_id,
                theme_id: design.theme_id.clone(),
                primary_color: design.primary_color.clone(),
                accent_color: design.accent_color.clone(),
                heading_font: design.heading_font.clone(),
                body_font: design.body_font.clone(),
                corner_radius: design.corner_radius,
                onboarding_completed: design.onboarding_completed.unwrap_or(false),
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn list_attachments(&self, project_id: Uuid) -> Result<Vec<Attachment>, DatabaseError> {
        let rows = self
            .inner
            .read()
            .await
            .attachments
            .values()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |a: &Attachment| std::cmp::Reverse(a.created_at)))
    }

    async fn get_attachment(&self, id: Uuid) -> Result<Option<Attachment>, DatabaseError> {
        Ok(self.inner.read().await.attachments.get(&id).cloned())
    }

    async fn create_attachment(&self, attachment: NewAttachment) -> Result<Attachment, DatabaseError> {
        let row = Attachment {
            id: Uuid::new_v4(),
            project_id: attachment.project_id,
            file_name: attachment.file_name,
            file_url: attachment.file_url,
            content_type: attachment.content_type,
            size_bytes: attachment.size_bytes,
            uploaded_by: attachment.uploaded_by,
            created_at: Utc::now(),
        };
        self.inner.write().await.attachments.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_attachment(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.inner.write().await.attachments.remove(&id).is_some())
    }

    async fn list_blog_posts(&self, published_only: bool) -> Result<Vec<BlogPost>, DatabaseError> {
        let rows = self
            .inner
            .read()
            .await
            .blog_posts
            .values()
            .filter(|p| p.published || !published_only)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |p: &BlogPost| {
            (std::cmp::Reverse(p.published_at), std::cmp::Reverse(p.created_at))
        }))
    }

    async fn get_blog_post(&self, slug: &str) -> Result<Option<BlogPost>, DatabaseError> {
        Ok(self.inner.read().await.blog_posts.get(slug).cloned())
    }

    async fn upsert_blog_post(&self, post: NewBlogPost) -> Result<BlogPost, DatabaseError> {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        let row = tables
            .blog_posts
            .entry(post.slug.clone())
            .and_modify(|existing| {
                existing.title = post.title.clone();
                existing.excerpt = post.excerpt.clone();
                existing.content = post.content.clone();
                existing.published = post.published;
                if post.published && existing.published_at.is_none() {
                    existing.published_at = Some(now);
                }
                existing.updated_at = now;
            })
            .or_insert_with(|| BlogPost {
                id: Uuid::new_v4(),
                slug: post.slug.clone(),
                title: post.title.clone(),
                excerpt: post.excerpt.clone(),
                content: post.content.clone(),
                published: post.published,
                published_at: post.published.then_some(now),
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }
}
