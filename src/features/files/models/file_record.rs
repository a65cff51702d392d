use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for uploaded files
///
/// `storage_key` is the blob store address and never leaves the server;
/// `short_code`, when present, makes the file publicly resolvable.
#[derive(Debug, Clone, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub storage_key: String,
    pub content_type: String,
    pub file_size: i64,
    pub short_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn is_shared(&self) -> bool {
        self.short_code.is_some()
    }
}

/// Insert payload for a new file record
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub storage_key: String,
    pub content_type: String,
    pub file_size: i64,
}
