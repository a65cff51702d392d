use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};

/// Stateless HS256 token service.
///
/// Tokens are self-contained: subject, issuance and expiry live in the signed
/// claims, so validation needs no server-side lookup. The flip side is that a
/// token cannot be revoked before its expiry; a future denylist would key on
/// the `jti` claim.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    /// Random per-token identifier; makes every issuance distinct
    jti: String,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_validity(
            &config.jwt_secret,
            Duration::hours(config.token_validity_hours),
        )
    }

    pub fn with_validity(secret: &str, validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity,
        }
    }

    /// Issue a signed token asserting the subject for the configured window.
    pub fn issue(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Extract the subject claim without enforcing expiry.
    ///
    /// The signature is still verified: a subject from a forged token would
    /// be worthless and is reported as malformed.
    pub fn parse_subject(&self, token: &str) -> Result<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::MalformedToken(e.to_string()))?;

        Ok(data.claims.sub)
    }

    /// True iff the signature verifies and the expiry is in the future.
    /// Never fails on malformed input.
    pub fn is_valid(&self, token: &str) -> bool {
        self.decode_valid(token).is_ok()
    }

    /// Issue a fresh token for the same subject.
    ///
    /// The old token is not invalidated; both remain independently valid
    /// until their own expiries.
    pub fn refresh(&self, token: &str) -> Result<String> {
        let claims = self
            .decode_valid(token)
            .map_err(|e| AppError::InvalidToken(e.to_string()))?;

        self.issue(&claims.sub)
    }

    fn decode_valid(&self, token: &str) -> std::result::Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::with_validity("test-secret", Duration::hours(24))
    }

    fn expired_service() -> TokenService {
        TokenService::with_validity("test-secret", Duration::hours(-1))
    }

    #[test]
    fn issued_token_is_valid_and_carries_subject() {
        let service = service();
        let token = service.issue("a@b.com").unwrap();

        assert!(service.is_valid(&token));
        assert_eq!(service.parse_subject(&token).unwrap(), "a@b.com");
    }

    #[test]
    fn expired_token_is_invalid() {
        let service = expired_service();
        let token = service.issue("a@b.com").unwrap();

        assert!(!service.is_valid(&token));
    }

    #[test]
    fn parse_subject_ignores_expiry() {
        let service = expired_service();
        let token = service.issue("a@b.com").unwrap();

        assert_eq!(service.parse_subject(&token).unwrap(), "a@b.com");
    }

    #[test]
    fn malformed_token_is_rejected_without_panicking() {
        let service = service();

        assert!(!service.is_valid("not-a-token"));
        assert!(!service.is_valid(""));
        assert!(matches!(
            service.parse_subject("not-a-token"),
            Err(AppError::MalformedToken(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let service = service();
        let other = TokenService::with_validity("other-secret", Duration::hours(24));
        let token = other.issue("a@b.com").unwrap();

        assert!(!service.is_valid(&token));
        assert!(matches!(
            service.parse_subject(&token),
            Err(AppError::MalformedToken(_))
        ));
    }

    #[test]
    fn refresh_preserves_subject_with_distinct_encoding() {
        let service = service();
        let token = service.issue("a@b.com").unwrap();
        let refreshed = service.refresh(&token).unwrap();

        assert_ne!(token, refreshed);
        assert_eq!(service.parse_subject(&refreshed).unwrap(), "a@b.com");

        // refreshing is additive: the old token stays valid
        assert!(service.is_valid(&token));
        assert!(service.is_valid(&refreshed));
    }

    #[test]
    fn refresh_of_expired_token_fails() {
        let service = expired_service();
        let token = service.issue("a@b.com").unwrap();

        assert!(matches!(
            service.refresh(&token),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn refresh_of_garbage_fails() {
        let service = service();

        assert!(matches!(
            service.refresh("garbage"),
            Err(AppError::InvalidToken(_))
        ));
    }
}
