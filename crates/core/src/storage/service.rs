//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{ErrorKind, Operator, services};
use tracing::debug;

use super::config::StorageConfig;
use super::error::StorageError;
use crate::media::content_type_for;
use voicereader_shared::StorageProvider;

/// An object read back from storage.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Storage key.
    pub key: String,
    /// Object contents.
    pub bytes: Bytes,
    /// Content type recorded by the backend, or guessed from the key.
    pub content_type: String,
}

/// Storage service for uploaded resources.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("provider", &self.config.provider.name())
            .field("max_file_size", &self.config.max_file_size)
            .finish_non_exhaustive()
    }
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// For the local provider the root directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                bucket,
                region,
                access_key_id,
                secret_access_key,
                endpoint,
            } => {
                let mut builder = services::S3::default()
                    .bucket(bucket)
                    .region(region)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                std::fs::create_dir_all(root)
                    .map_err(|e| StorageError::configuration(e.to_string()))?;
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Build the storage key for a file under a resource prefix.
    ///
    /// Format: `{prefix}/{sanitized_filename}`
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for empty names and `.`/`..`.
    pub fn storage_key(prefix: &str, filename: &str) -> Result<String, StorageError> {
        let sanitized = sanitize_filename(filename);
        if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
            return Err(StorageError::invalid_key(filename));
        }

        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            Ok(sanitized)
        } else {
            Ok(format!("{prefix}/{sanitized}"))
        }
    }

    /// Save a file under a resource prefix, replacing any previous object.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is too large, the key is invalid, or the
    /// backend write fails.
    pub async fn save(
        &self,
        prefix: &str,
        filename: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let size = bytes.len() as u64;
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(size, self.config.max_file_size));
        }

        let key = Self::storage_key(prefix, filename)?;

        let result = if self.operator.info().full_capability().write_with_content_type {
            self.operator
                .write_with(&key, bytes)
                .content_type(content_type)
                .await
        } else {
            self.operator.write(&key, bytes).await
        };
        result.map_err(|e| StorageError::from_opendal(&key, &e))?;

        debug!(key = %key, size, provider = self.provider_name(), "Stored object");
        Ok(key)
    }

    /// Read a file stored under a resource prefix.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is stored under the key.
    pub async fn fetch(&self, prefix: &str, filename: &str) -> Result<StoredObject, StorageError> {
        let key = Self::storage_key(prefix, filename)?;

        let meta = self
            .operator
            .stat(&key)
            .await
            .map_err(|e| StorageError::from_opendal(&key, &e))?;
        let buffer = self
            .operator
            .read(&key)
            .await
            .map_err(|e| StorageError::from_opendal(&key, &e))?;

        let content_type = meta
            .content_type()
            .map_or_else(|| content_type_for(&key).to_string(), String::from);

        Ok(StoredObject {
            bytes: buffer.to_bytes(),
            content_type,
            key,
        })
    }

    /// Delete a file from storage. Deleting a missing file succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, prefix: &str, filename: &str) -> Result<(), StorageError> {
        let key = Self::storage_key(prefix, filename)?;
        self.operator
            .delete(&key)
            .await
            .map_err(|e| StorageError::from_opendal(&key, &e))
    }

    /// Check if a file exists in storage.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid key or when the backend cannot answer.
    pub async fn exists(&self, prefix: &str, filename: &str) -> Result<bool, StorageError> {
        let key = Self::storage_key(prefix, filename)?;
        match self.operator.stat(&key).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::from_opendal(&key, &e)),
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
