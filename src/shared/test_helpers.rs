//! In-memory collaborator doubles and router fixtures for tests.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use chrono::Utc;
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::auth::models::{NewUser, User};
#[cfg(test)]
use crate::features::auth::store::UserStore;
#[cfg(test)]
use crate::features::files::models::{FileRecord, NewFileRecord};
#[cfg(test)]
use crate::features::files::store::FileRecordStore;
#[cfg(test)]
use crate::modules::storage::BlobStore;

/// In-memory `UserStore`
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[cfg(test)]
impl InMemoryUserStore {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn set_enabled(&self, email: &str, enabled: bool) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.enabled = enabled;
        }
    }
}

#[cfg(test)]
#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            enabled: user.enabled,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

/// In-memory `FileRecordStore` that mirrors the uniqueness guarantees of the
/// database schema.
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryFileRecordStore {
    records: Mutex<Vec<FileRecord>>,
}

#[cfg(test)]
#[async_trait]
impl FileRecordStore for InMemoryFileRecordStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        let mut records = self.records.lock().unwrap();
        let now = Utc::now();
        let created = FileRecord {
            id: Uuid::new_v4(),
            owner_id: record.owner_id,
            title: record.title,
            description: record.description,
            storage_key: record.storage_key,
            content_type: record.content_type,
            file_size: record.file_size,
            short_code: None,
            created_at: now,
            updated_at: now,
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<FileRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.short_code.as_deref() == Some(code))
            .cloned())
    }

    async fn set_short_code(&self, id: Uuid, code: Option<&str>) -> Result<FileRecord> {
        let mut records = self.records.lock().unwrap();

        if let Some(code) = code {
            if records
                .iter()
                .any(|r| r.id != id && r.short_code.as_deref() == Some(code))
            {
                return Err(AppError::Conflict("Short code already in use".to_string()));
            }
        }

        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        record.short_code = code.map(|c| c.to_string());
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        Ok(())
    }
}

/// In-memory `BlobStore`
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl InMemoryBlobStore {
    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    /// Drop a blob behind the store's back, simulating lost content.
    pub fn remove(&self, key: &str) {
        self.blobs.lock().unwrap().remove(key);
    }
}

#[cfg(test)]
#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<()> {
        self.blobs.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Blob '{}' not found", key)))
    }

    async fn delete_if_exists(&self, key: &str) -> Result<bool> {
        Ok(self.blobs.lock().unwrap().remove(key).is_some())
    }
}

/// Wrap a router so every request carries the given identity, bypassing the
/// bearer-token middleware.
#[cfg(test)]
pub fn with_authenticated_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
