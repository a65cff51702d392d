use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::BlobStore;

/// MinIO/S3-compatible blob store
pub struct MinioBlobStore {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
}

impl MinioBlobStore {
    /// Create a new blob store from configuration, creating the bucket if it
    /// does not exist yet.
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create storage bucket: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let store = Self {
            bucket,
            region,
            credentials,
        };

        store.ensure_bucket_exists().await?;

        info!(
            "Blob store initialized for endpoint: {}, bucket: {}",
            config.endpoint,
            store.bucket.name()
        );

        Ok(store)
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<()> {
        match self.create_bucket().await {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                // Bucket already exists - this is fine
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                    Ok(())
                }
            }
        }
    }

    async fn create_bucket(&self) -> Result<()> {
        Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        .map_err(|e| {
            AppError::StorageFailure(format!(
                "Failed to create bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        Ok(())
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    fn is_not_found(err: &S3Error) -> bool {
        let error_str = err.to_string();
        error_str.contains("404") || error_str.contains("NoSuchKey")
    }
}

#[async_trait]
impl BlobStore for MinioBlobStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| AppError::StorageFailure(format!("Failed to store blob '{}': {}", key, e)))?;

        debug!("Stored blob '{}' in bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let response = match self.bucket.get_object(key).await {
            Ok(response) => response,
            Err(e) if Self::is_not_found(&e) => {
                return Err(AppError::NotFound(format!("Blob '{}' not found", key)));
            }
            Err(e) => {
                return Err(AppError::StorageFailure(format!(
                    "Failed to read blob '{}': {}",
                    key, e
                )));
            }
        };

        match response.status_code() {
            code if (200..300).contains(&code) => Ok(response.to_vec()),
            404 => Err(AppError::NotFound(format!("Blob '{}' not found", key))),
            code => Err(AppError::StorageFailure(format!(
                "Failed to read blob '{}': HTTP {}",
                key, code
            ))),
        }
    }

    async fn delete_if_exists(&self, key: &str) -> Result<bool> {
        // S3 deletes are blind, so check existence first to keep the
        // contract's boolean honest
        match self.bucket.head_object(key).await {
            Ok(_) => {}
            Err(e) if Self::is_not_found(&e) => return Ok(false),
            Err(e) => {
                return Err(AppError::StorageFailure(format!(
                    "Failed to check blob '{}': {}",
                    key, e
                )));
            }
        }

        self.bucket.delete_object(key).await.map_err(|e| {
            AppError::StorageFailure(format!("Failed to delete blob '{}': {}", key, e))
        })?;

        debug!("Deleted blob '{}' from bucket '{}'", key, self.bucket.name());
        Ok(true)
    }
}
