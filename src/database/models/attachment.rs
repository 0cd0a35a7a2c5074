use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for a file held by external object storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttachment {
    pub project_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: String,
}
