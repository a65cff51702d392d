use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{
    delete_file, download_shared, get_file, list_files, revoke_share, share_file, upload_file,
};
use crate::features::files::services::FileService;
use crate::shared::constants::MAX_FILE_SIZE;

/// Owner-facing file routes; the caller must mount these behind the auth
/// middleware.
pub fn routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/files/upload",
            // Allow body size up to MAX_FILE_SIZE + buffer for multipart overhead
            post(upload_file).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route("/api/files", get(list_files))
        .route("/api/files/{id}", get(get_file).delete(delete_file))
        .route(
            "/api/files/{id}/share",
            post(share_file).delete(revoke_share),
        )
        .with_state(service)
}

/// The unauthenticated short-link download route.
pub fn public_routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route("/public/{short_code}", get(download_shared))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::shared::test_helpers::{
        with_authenticated_user, InMemoryBlobStore, InMemoryFileRecordStore,
    };
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;
    use serde_json::Value;
    use uuid::Uuid;

    fn fixture() -> (Arc<FileService>, AuthenticatedUser) {
        let records = Arc::new(InMemoryFileRecordStore::default());
        let blobs = Arc::new(InMemoryBlobStore::default());
        let service = Arc::new(FileService::new(records, blobs));
        let user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
        };
        (service, user)
    }

    #[tokio::test]
    async fn shared_file_downloads_with_sniffed_headers() {
        let (service, user) = fixture();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user.user_id)
            .await
            .unwrap();
        let shared = service.share(record.id, user.user_id).await.unwrap();
        let code = shared.short_code.unwrap();

        let server = TestServer::new(public_routes(service)).unwrap();
        let response = server.get(&format!("/public/{}", code)).await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.header(header::CONTENT_TYPE), "text/plain");
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            "inline; filename=\"note\""
        );
        assert_eq!(response.text(), "hi\n");
    }

    #[tokio::test]
    async fn revoked_code_returns_not_found() {
        let (service, user) = fixture();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user.user_id)
            .await
            .unwrap();
        let shared = service.share(record.id, user.user_id).await.unwrap();
        let code = shared.short_code.unwrap();
        service.revoke_share(record.id, user.user_id).await.unwrap();

        let server = TestServer::new(public_routes(service)).unwrap();
        let response = server.get(&format!("/public/{}", code)).await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn owner_routes_list_and_delete() {
        let (service, user) = fixture();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user.user_id)
            .await
            .unwrap();

        let server =
            TestServer::new(with_authenticated_user(routes(service), user.clone())).unwrap();

        let listed = server.get("/api/files").await;
        listed.assert_status(StatusCode::OK);
        let body: Value = listed.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["title"], "note");
        // the storage key never reaches clients
        assert!(body["data"][0].get("storageKey").is_none());
        assert!(body["data"][0].get("storage_key").is_none());

        let deleted = server.delete(&format!("/api/files/{}", record.id)).await;
        deleted.assert_status(StatusCode::OK);

        let listed = server.get("/api/files").await;
        assert_eq!(listed.json::<Value>()["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn share_endpoint_returns_code_and_url() {
        let (service, user) = fixture();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user.user_id)
            .await
            .unwrap();

        let server =
            TestServer::new(with_authenticated_user(routes(service), user.clone())).unwrap();

        let shared = server
            .post(&format!("/api/files/{}/share", record.id))
            .await;
        shared.assert_status(StatusCode::OK);
        let body: Value = shared.json();
        let code = body["data"]["shortCode"].as_str().unwrap();
        assert_eq!(code.len(), 8);
        assert_eq!(
            body["data"]["shareUrl"].as_str().unwrap(),
            format!("/public/{}", code)
        );

        let revoked = server
            .delete(&format!("/api/files/{}/share", record.id))
            .await;
        revoked.assert_status(StatusCode::OK);
        assert_eq!(revoked.json::<Value>()["data"]["shared"], false);
    }
}
