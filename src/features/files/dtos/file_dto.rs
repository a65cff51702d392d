use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::files::models::FileRecord;

/// Upload request for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Display title for the file
    #[schema(example = "quarterly report")]
    pub title: String,
    /// Optional description
    pub desc: Option<String>,
}

/// Response DTO for file records
///
/// The blob storage key deliberately never appears here.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileRecordDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// MIME type sniffed from the uploaded bytes
    pub content_type: String,
    /// Size of the file in bytes
    pub file_size: i64,
    /// Whether a share link is currently active
    pub shared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    /// Relative public URL, present while the file is shared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for FileRecordDto {
    fn from(record: FileRecord) -> Self {
        let share_url = record
            .short_code
            .as_ref()
            .map(|code| format!("/public/{}", code));

        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            content_type: record.content_type,
            file_size: record.file_size,
            shared: record.short_code.is_some(),
            short_code: record.short_code,
            share_url,
            created_at: record.created_at,
        }
    }
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    /// Confirmation that the file was deleted
    pub deleted: bool,
}
