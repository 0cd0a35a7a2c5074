use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Visual theme of a project plus the onboarding flag that gates the project view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Design {
    pub id: Uuid,
    pub project_id: Uuid,
    pub theme_id: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub heading_font: Option<String>,
    pub body_font: Option<String>,
    pub corner_radius: Option<i32>,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload keyed by project id.
///
/// `onboarding_completed: None` keeps the stored flag (false for a new row).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignInput {
    pub theme_id: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub heading_font: Option<String>,
    pub body_font: Option<String>,
    pub corner_radius: Option<i32>,
    pub onboarding_completed: Option<bool>,
}
