use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::files::services::FileService;

/// Download a shared file by its short code
///
/// Unauthenticated by design. The response carries the content type sniffed
/// at upload time and a Content-Disposition computed from it: renderable
/// families display inline, everything else downloads as an attachment.
#[utoipa::path(
    get,
    path = "/public/{short_code}",
    tag = "public",
    params(
        ("short_code" = String, Path, description = "Share code of the file")
    ),
    responses(
        (status = 200, description = "File bytes with sniffed Content-Type and computed Content-Disposition"),
        (status = 404, description = "Unknown or revoked code, or missing content")
    )
)]
pub async fn download_shared(
    State(service): State<Arc<FileService>>,
    Path(short_code): Path<String>,
) -> Result<Response, AppError> {
    let file = service.resolve_public(&short_code).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &file.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "{}; filename=\"{}\"",
                file.disposition.as_str(),
                sanitize_filename(&file.filename)
            ),
        )
        .body(Body::from(file.bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))
}

/// Keep the suggested filename header-safe: anything outside a conservative
/// character set becomes an underscore.
fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("report 2024.pdf"), "report 2024.pdf");
    }

    #[test]
    fn sanitize_replaces_header_breaking_characters() {
        assert_eq!(sanitize_filename("a\"b\\c\nd"), "a_b_c_d");
    }
}
