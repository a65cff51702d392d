use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::mime::{self, Disposition};
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::store::FileRecordStore;
use crate::modules::storage::BlobStore;
use crate::shared::constants::{SHORT_CODE_LEN, SHORT_CODE_MAX_ATTEMPTS};

/// A publicly resolvable file: the bytes plus everything a download response
/// needs.
#[derive(Debug)]
pub struct PublicFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub disposition: Disposition,
    pub filename: String,
}

/// Ownership enforcement and share-link lifecycle over the record and blob
/// stores.
pub struct FileService {
    records: Arc<dyn FileRecordStore>,
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    pub fn new(records: Arc<dyn FileRecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { records, blobs }
    }

    /// Store uploaded bytes and persist their metadata record.
    ///
    /// The content type is sniffed from the bytes, never taken from the
    /// client. The blob is written before the record: a failed blob write
    /// persists nothing, a failed record insert leaves at worst an orphaned
    /// blob, which best-effort cleanup tries to remove.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        title: &str,
        description: Option<String>,
        owner_id: Uuid,
    ) -> Result<FileRecord> {
        let storage_key = format!("uploads/{}/{}", owner_id, Uuid::new_v4());
        let content_type = mime::sniff_content_type(&data);
        let file_size = data.len() as i64;

        self.blobs.put(&storage_key, data, &content_type).await?;

        let inserted = self
            .records
            .insert(NewFileRecord {
                owner_id,
                title: title.to_string(),
                description,
                storage_key: storage_key.clone(),
                content_type,
                file_size,
            })
            .await;

        let record = match inserted {
            Ok(record) => record,
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete_if_exists(&storage_key).await {
                    warn!(
                        "Orphaned blob '{}' left behind after failed record insert: {}",
                        storage_key, cleanup
                    );
                }
                return Err(e);
            }
        };

        info!(
            "File uploaded: id={}, owner={}, type={}, size={}",
            record.id, record.owner_id, record.content_type, record.file_size
        );

        Ok(record)
    }

    pub async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
        self.records.find_by_owner(owner_id).await
    }

    /// Ownership-checked single-record fetch.
    pub async fn get_owned(&self, id: Uuid, requester: Uuid) -> Result<FileRecord> {
        let record = self.require(id).await?;
        Self::assert_owner(&record, requester)?;
        Ok(record)
    }

    /// Delete a record and its blob.
    ///
    /// Blob deletion is attempted first and is idempotent; its failure is
    /// logged but never blocks record deletion. An orphaned blob beats an
    /// inaccessible record.
    pub async fn delete(&self, id: Uuid, requester: Uuid) -> Result<()> {
        let record = self.require(id).await?;
        Self::assert_owner(&record, requester)?;

        match self.blobs.delete_if_exists(&record.storage_key).await {
            Ok(existed) => {
                if !existed {
                    debug!("Blob '{}' was already absent", record.storage_key);
                }
            }
            Err(e) => {
                warn!(
                    "Blob delete failed for '{}', removing record anyway: {}",
                    record.storage_key, e
                );
            }
        }

        self.records.delete(id).await?;

        info!("File deleted: id={}, owner={}", id, requester);
        Ok(())
    }

    /// Allocate a share code for a record, making it publicly resolvable.
    ///
    /// Codes come from a random identifier; the store's uniqueness guarantee
    /// arbitrates the rare collision and the allocation is retried.
    pub async fn share(&self, id: Uuid, requester: Uuid) -> Result<FileRecord> {
        let record = self.require(id).await?;
        Self::assert_owner(&record, requester)?;

        let mut attempts = 0;
        loop {
            attempts += 1;
            let code = generate_short_code();

            match self.records.set_short_code(id, Some(&code)).await {
                Err(AppError::Conflict(_)) if attempts < SHORT_CODE_MAX_ATTEMPTS => {
                    debug!("Short code collision on attempt {}, regenerating", attempts);
                }
                Ok(updated) => {
                    info!("File shared: id={}, code={}", updated.id, code);
                    return Ok(updated);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Clear the share code, returning the record to private.
    pub async fn revoke_share(&self, id: Uuid, requester: Uuid) -> Result<FileRecord> {
        let record = self.require(id).await?;
        Self::assert_owner(&record, requester)?;

        let updated = self.records.set_short_code(id, None).await?;

        info!("Share revoked: id={}", id);
        Ok(updated)
    }

    /// Resolve a share code to downloadable content.
    ///
    /// This is the one intentionally unauthenticated path. Unknown codes,
    /// revoked codes and records whose blob has gone missing are all the
    /// same `NotFound` to the caller.
    pub async fn resolve_public(&self, code: &str) -> Result<PublicFile> {
        let record = self
            .records
            .find_by_short_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let bytes = match self.blobs.get(&record.storage_key).await {
            Ok(bytes) => bytes,
            Err(AppError::NotFound(_)) => {
                warn!(
                    "Blob missing for shared record {} (key '{}')",
                    record.id, record.storage_key
                );
                return Err(AppError::NotFound("File not found".to_string()));
            }
            Err(e) => return Err(e),
        };

        Ok(PublicFile {
            bytes,
            disposition: mime::disposition_for(&record.content_type),
            content_type: record.content_type,
            filename: record.title,
        })
    }

    async fn require(&self, id: Uuid) -> Result<FileRecord> {
        self.records
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// The single authorization predicate for every mutating operation.
    fn assert_owner(record: &FileRecord, requester: Uuid) -> Result<()> {
        if record.owner_id != requester {
            return Err(AppError::AccessDenied(
                "You do not have permission to access this file".to_string(),
            ));
        }
        Ok(())
    }
}

fn generate_short_code() -> String {
    Uuid::new_v4().simple().to_string()[..SHORT_CODE_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{InMemoryBlobStore, InMemoryFileRecordStore};

    fn fixture() -> (FileService, Arc<InMemoryFileRecordStore>, Arc<InMemoryBlobStore>) {
        let records = Arc::new(InMemoryFileRecordStore::default());
        let blobs = Arc::new(InMemoryBlobStore::default());
        let service = FileService::new(records.clone(), blobs.clone());
        (service, records, blobs)
    }

    fn owner() -> Uuid {
        Uuid::new_v4()
    }

    #[tokio::test]
    async fn upload_sniffs_text_and_starts_private() {
        let (service, _, blobs) = fixture();
        let user = owner();

        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user)
            .await
            .unwrap();

        assert!(record.content_type.starts_with("text/"));
        assert_eq!(record.file_size, 3);
        assert_eq!(record.short_code, None);
        assert_eq!(record.owner_id, user);
        assert!(blobs.contains(&record.storage_key));
    }

    #[tokio::test]
    async fn upload_detects_magic_numbers() {
        let (service, _, _) = fixture();
        let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00];

        let record = service.upload(png, "pic", None, owner()).await.unwrap();

        assert_eq!(record.content_type, "image/png");
    }

    #[tokio::test]
    async fn share_then_resolve_returns_exact_bytes() {
        let (service, _, _) = fixture();
        let user = owner();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user)
            .await
            .unwrap();

        let shared = service.share(record.id, user).await.unwrap();
        let code = shared.short_code.unwrap();
        assert_eq!(code.len(), SHORT_CODE_LEN);

        let public = service.resolve_public(&code).await.unwrap();
        assert_eq!(public.bytes, b"hi\n");
        assert_eq!(public.content_type, "text/plain");
        assert_eq!(public.disposition, Disposition::Inline);
        assert_eq!(public.filename, "note");
    }

    #[tokio::test]
    async fn archive_resolves_as_attachment() {
        let (service, _, _) = fixture();
        let user = owner();
        // zip local-file-header magic
        let zip = vec![0x50, 0x4b, 0x03, 0x04, 0x14, 0x00, 0x00, 0x00];
        let record = service.upload(zip, "bundle", None, user).await.unwrap();

        let shared = service.share(record.id, user).await.unwrap();
        let public = service
            .resolve_public(&shared.short_code.unwrap())
            .await
            .unwrap();

        assert_eq!(public.disposition, Disposition::Attachment);
    }

    #[tokio::test]
    async fn revoked_code_no_longer_resolves() {
        let (service, _, _) = fixture();
        let user = owner();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user)
            .await
            .unwrap();
        let shared = service.share(record.id, user).await.unwrap();
        let code = shared.short_code.unwrap();

        let revoked = service.revoke_share(record.id, user).await.unwrap();
        assert_eq!(revoked.short_code, None);

        let err = service.resolve_public(&code).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (service, _, _) = fixture();

        let err = service.resolve_public("deadbeef").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let (service, _, blobs) = fixture();
        let user = owner();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user)
            .await
            .unwrap();
        let shared = service.share(record.id, user).await.unwrap();

        blobs.remove(&record.storage_key);

        let err = service
            .resolve_public(&shared.short_code.unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_owner_cannot_share_delete_or_fetch() {
        let (service, _, blobs) = fixture();
        let user = owner();
        let stranger = owner();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user)
            .await
            .unwrap();

        for err in [
            service.share(record.id, stranger).await.unwrap_err(),
            service.revoke_share(record.id, stranger).await.unwrap_err(),
            service.delete(record.id, stranger).await.unwrap_err(),
            service.get_owned(record.id, stranger).await.unwrap_err(),
        ] {
            assert!(matches!(err, AppError::AccessDenied(_)));
        }

        // record and blob untouched
        let owned = service.list_owned(user).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert!(blobs.contains(&record.storage_key));
    }

    #[tokio::test]
    async fn owner_delete_removes_record_and_blob() {
        let (service, _, blobs) = fixture();
        let user = owner();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user)
            .await
            .unwrap();

        service.delete(record.id, user).await.unwrap();

        assert!(service.list_owned(user).await.unwrap().is_empty());
        assert!(!blobs.contains(&record.storage_key));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let (service, _, _) = fixture();

        let err = service.delete(Uuid::new_v4(), owner()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_owned_sees_only_own_files() {
        let (service, _, _) = fixture();
        let alice = owner();
        let bob = owner();
        service
            .upload(b"a".to_vec(), "a", None, alice)
            .await
            .unwrap();
        service.upload(b"b".to_vec(), "b", None, bob).await.unwrap();

        let owned = service.list_owned(alice).await.unwrap();

        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].title, "a");
    }

    #[tokio::test]
    async fn resharing_replaces_the_code() {
        let (service, _, _) = fixture();
        let user = owner();
        let record = service
            .upload(b"hi\n".to_vec(), "note", None, user)
            .await
            .unwrap();

        let first = service.share(record.id, user).await.unwrap();
        let second = service.share(record.id, user).await.unwrap();
        let first_code = first.short_code.unwrap();
        let second_code = second.short_code.unwrap();
        assert_ne!(first_code, second_code);

        // only the latest code resolves
        assert!(service.resolve_public(&second_code).await.is_ok());
        assert!(matches!(
            service.resolve_public(&first_code).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
