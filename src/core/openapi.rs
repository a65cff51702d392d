use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::dtos as auth_dtos;
use crate::features::auth::handlers as auth_handlers;
use crate::features::files::dtos as files_dtos;
use crate::features::files::handlers as files_handlers;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::validate,
        auth_handlers::refresh,
        auth_handlers::logout,
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::delete_file,
        files_handlers::share_file,
        files_handlers::revoke_share,
        // Public
        files_handlers::download_shared,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::ValidateResponseDto,
            auth_dtos::RefreshResponseDto,
            auth_dtos::LogoutResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::ValidateResponseDto>,
            ApiResponse<auth_dtos::RefreshResponseDto>,
            ApiResponse<auth_dtos::LogoutResponseDto>,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileRecordDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileRecordDto>,
            ApiResponse<Vec<files_dtos::FileRecordDto>>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token lifecycle"),
        (name = "files", description = "File upload, ownership and sharing"),
        (name = "public", description = "Unauthenticated short-link downloads"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Filecove API",
        version = "0.1.0",
        description = "Authenticated file storage with short-link sharing",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
