use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{bearer_token, AppJson};
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, LogoutResponseDto, RefreshResponseDto, RegisterRequestDto,
    ValidateResponseDto,
};
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Invalid email format or weak password"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is disabled")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Validate the presented bearer token
#[utoipa::path(
    post,
    path = "/api/auth/validate",
    responses(
        (status = 200, description = "Token is valid", body = ApiResponse<ValidateResponseDto>),
        (status = 400, description = "Missing or malformed Authorization header"),
        (status = 401, description = "Invalid or expired token"),
        (status = 404, description = "Token subject no longer exists")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn validate(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<ValidateResponseDto>>> {
    let token = bearer_token(&headers)?;
    let identity = service.validate(token).await?;

    Ok(Json(ApiResponse::success(
        Some(ValidateResponseDto {
            valid: true,
            email: identity.email,
            user_id: identity.user_id,
        }),
        None,
        None,
    )))
}

/// Refresh the presented bearer token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Token refreshed successfully", body = ApiResponse<RefreshResponseDto>),
        (status = 400, description = "Missing or malformed Authorization header"),
        (status = 401, description = "Invalid or expired token")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refresh(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RefreshResponseDto>>> {
    let token = bearer_token(&headers)?;
    let response = service.refresh(token)?;

    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Logout (client-side token disposal)
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// endpoint exists so clients have a uniform logout call.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout acknowledged", body = ApiResponse<LogoutResponseDto>)
    ),
    tag = "auth"
)]
pub async fn logout() -> Json<ApiResponse<LogoutResponseDto>> {
    Json(ApiResponse::success(
        Some(LogoutResponseDto {
            message: "Logout successful".to_string(),
        }),
        None,
        None,
    ))
}
