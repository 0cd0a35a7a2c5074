use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Credential a client hands over for their project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Secret {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub value: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSecret {
    pub project_id: Uuid,
    pub name: String,
    pub value: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProjectUrl {
    pub id: Uuid,
    pub project_id: Uuid,
    pub label: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProjectUrl {
    pub project_id: Uuid,
    pub label: String,
    pub url: String,
}
