use uuid::Uuid;

/// Identity resolved from a validated bearer token, carried in request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}
