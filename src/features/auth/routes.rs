use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Auth routes. All of them parse credentials or the bearer token
/// themselves, so none sit behind the auth middleware.
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/validate", post(handlers::validate))
        .route("/api/auth/refresh", post(handlers::refresh))
        .route("/api/auth/logout", post(handlers::logout))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::services::{BcryptHasher, TokenService};
    use crate::shared::test_helpers::InMemoryUserStore;
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use chrono::Duration;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        let users = Arc::new(InMemoryUserStore::default());
        let tokens = Arc::new(TokenService::with_validity(
            "test-secret",
            Duration::hours(1),
        ));
        let service = Arc::new(AuthService::new(
            users,
            Arc::new(BcryptHasher::new(4)),
            tokens,
        ));
        TestServer::new(public_routes(service)).unwrap()
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    #[tokio::test]
    async fn register_login_validate_flow() {
        let server = server();

        let registered = server
            .post("/api/auth/register")
            .json(&json!({"email": "a@b.com", "password": "Abc12345"}))
            .await;
        registered.assert_status(StatusCode::CREATED);
        let body: Value = registered.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email"], "a@b.com");

        let logged_in = server
            .post("/api/auth/login")
            .json(&json!({"email": "a@b.com", "password": "Abc12345"}))
            .await;
        logged_in.assert_status(StatusCode::OK);
        let token = logged_in.json::<Value>()["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();

        let validated = server
            .post("/api/auth/validate")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;
        validated.assert_status(StatusCode::OK);
        let body: Value = validated.json();
        assert_eq!(body["data"]["valid"], true);
        assert_eq!(body["data"]["email"], "a@b.com");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let server = server();

        server
            .post("/api/auth/register")
            .json(&json!({"email": "a@b.com", "password": "Abc12345"}))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .post("/api/auth/register")
            .json(&json!({"email": "a@b.com", "password": "Abc12345"}))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn weak_password_is_bad_request() {
        let server = server();

        server
            .post("/api/auth/register")
            .json(&json!({"email": "a@b.com", "password": "abc12345"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_with_bad_credentials_is_unauthorized() {
        let server = server();

        server
            .post("/api/auth/login")
            .json(&json!({"email": "ghost@b.com", "password": "Abc12345"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn validate_without_bearer_prefix_is_bad_request() {
        let server = server();

        server
            .post("/api/auth/validate")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("nonsense"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_issues_fresh_token() {
        let server = server();

        let registered = server
            .post("/api/auth/register")
            .json(&json!({"email": "a@b.com", "password": "Abc12345"}))
            .await;
        let token = registered.json::<Value>()["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();

        let refreshed = server
            .post("/api/auth/refresh")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;
        refreshed.assert_status(StatusCode::OK);
        let body: Value = refreshed.json();
        assert_eq!(body["data"]["email"], "a@b.com");
        assert_ne!(body["data"]["token"].as_str().unwrap(), token);
    }
}
