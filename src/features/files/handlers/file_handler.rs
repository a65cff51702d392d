use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{DeleteFileResponseDto, FileRecordDto, UploadFileDto};
use crate::features::files::services::FileService;
use crate::shared::constants::MAX_FILE_SIZE;
use crate::shared::types::{ApiResponse, Meta};

/// Upload a file
///
/// Accepts multipart/form-data with:
/// - `file`: The file to upload (required)
/// - `title`: Display title (required)
/// - `desc`: Optional description
///
/// The stored content type is sniffed from the uploaded bytes; any type the
/// client declares on the part is ignored.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form with title and optional description",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileRecordDto>),
        (status = 400, description = "Missing file or title, or file too large"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileRecordDto>>), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                file_data = Some(data.to_vec());
            }
            "title" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read title field: {}", e))
                })?;
                if !text.is_empty() {
                    title = Some(text);
                }
            }
            "desc" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read desc field: {}", e))
                })?;
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::Validation("File is required".to_string()))?;
    let title = title.ok_or_else(|| AppError::Validation("Title is required".to_string()))?;

    if file_data.len() > MAX_FILE_SIZE {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let record = service
        .upload(file_data, &title, description, user.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(record.into()), None, None)),
    ))
}

/// List the authenticated user's files
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "Owned file records", body = ApiResponse<Vec<FileRecordDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
) -> Result<Json<ApiResponse<Vec<FileRecordDto>>>, AppError> {
    let records = service.list_owned(user.user_id).await?;
    let total = records.len() as i64;
    let dtos = records.into_iter().map(FileRecordDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Fetch a single owned file record with its share status
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File identifier")
    ),
    responses(
        (status = 200, description = "File record", body = ApiResponse<FileRecordDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileRecordDto>>, AppError> {
    let record = service.get_owned(id, user.user_id).await?;

    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}

/// Delete an owned file and its stored bytes
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File identifier")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = ApiResponse<DeleteFileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>, AppError> {
    service.delete(id, user.user_id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully".to_string()),
        None,
    )))
}

/// Generate a share link for an owned file
#[utoipa::path(
    post,
    path = "/api/files/{id}/share",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File identifier")
    ),
    responses(
        (status = 200, description = "File shared, record carries the short code", body = ApiResponse<FileRecordDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn share_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileRecordDto>>, AppError> {
    let record = service.share(id, user.user_id).await?;

    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}

/// Revoke a file's share link
#[utoipa::path(
    delete,
    path = "/api/files/{id}/share",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File identifier")
    ),
    responses(
        (status = 200, description = "Share revoked", body = ApiResponse<FileRecordDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn revoke_share(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileRecordDto>>, AppError> {
    let record = service.revoke_share(id, user.user_id).await?;

    Ok(Json(ApiResponse::success(
        Some(record.into()),
        Some("File sharing revoked successfully".to_string()),
        None,
    )))
}
