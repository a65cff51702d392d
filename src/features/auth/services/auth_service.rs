use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RefreshResponseDto, RegisterRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::models::NewUser;
use crate::features::auth::services::password::PasswordHasher;
use crate::features::auth::services::token_service::TokenService;
use crate::features::auth::store::UserStore;
use crate::shared::validation::{is_strong_password, EMAIL_REGEX};

/// Orchestrates registration, login and token validation over the user
/// store, the password hasher and the token service.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new user and issue their first token.
    ///
    /// Checks run in a fixed order, first failure short-circuits: existing
    /// email, then email format, then password strength. Nothing is persisted
    /// before all checks pass.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        if self.users.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        if !EMAIL_REGEX.is_match(&dto.email) {
            return Err(AppError::InvalidEmailFormat);
        }

        if !is_strong_password(&dto.password) {
            return Err(AppError::WeakPassword);
        }

        let password_hash = self.hasher.hash(&dto.password)?;

        let user = self
            .users
            .insert(NewUser {
                email: dto.email,
                password_hash,
                enabled: true,
            })
            .await?;

        let token = self.tokens.issue(&user.email)?;

        info!("User registered: {}", user.email);

        Ok(AuthResponseDto {
            token,
            email: user.email,
            user_id: user.id,
            message: "User registered successfully".to_string(),
        })
    }

    /// Authenticate a user and issue a fresh token.
    ///
    /// The enabled flag is checked only after a credential match so that an
    /// unauthenticated caller cannot probe account status.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.hasher.verify(&dto.password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        if !user.enabled {
            return Err(AppError::AccountDisabled);
        }

        let token = self.tokens.issue(&user.email)?;

        info!("User logged in: {}", user.email);

        Ok(AuthResponseDto {
            token,
            email: user.email,
            user_id: user.id,
            message: "Login successful".to_string(),
        })
    }

    /// Resolve a presented token to an identity.
    ///
    /// The token must be well-formed, unexpired, and its subject must still
    /// resolve to an existing enabled user.
    pub async fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let subject = self.tokens.parse_subject(token)?;

        if !self.tokens.is_valid(token) {
            return Err(AppError::InvalidToken("token expired".to_string()));
        }

        let user = self
            .users
            .find_by_email(&subject)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.enabled {
            return Err(AppError::AccountDisabled);
        }

        Ok(AuthenticatedUser {
            user_id: user.id,
            email: user.email,
        })
    }

    /// Exchange a still-valid token for a fresh one.
    ///
    /// Only the token is revalidated; the subject is not resolved again, so a
    /// user disabled after issuance can keep refreshing until the token's own
    /// expiry. The validate path guards every protected route, which keeps
    /// those refreshed tokens unusable.
    pub fn refresh(&self, token: &str) -> Result<RefreshResponseDto> {
        let refreshed = self.tokens.refresh(token)?;
        let email = self.tokens.parse_subject(&refreshed)?;

        Ok(RefreshResponseDto {
            token: refreshed,
            email,
            message: "Token refreshed successfully".to_string(),
        })
    }
}
