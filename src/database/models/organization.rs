use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    pub external_id: String,
    pub name: String,
    pub slug: Option<String>,
}

/// Organization membership; the access relation is derived from these rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub id: Uuid,
    pub external_id: String,
    pub organization_id: Uuid,
    pub user_id: String,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMembership {
    pub external_id: String,
    pub organization_id: Uuid,
    pub user_id: String,
    pub role: Option<String>,
}
