//! Storage error types.

use thiserror::Error;
use voicereader_shared::AppError;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object size exceeds maximum allowed.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Object not found in storage.
    #[error("file not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Invalid storage key format.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Maps an OpenDAL error for the given key.
    #[must_use]
    pub fn from_opendal(key: &str, err: &opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::not_found(key),
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => {
                Self::NotFound(voicereader_shared::error::messages::NOT_EXISTS_DATA.to_string())
            }
            StorageError::FileTooLarge { .. } | StorageError::InvalidKey(_) => {
                Self::Validation(err.to_string())
            }
            StorageError::Configuration(_) | StorageError::Operation(_) => {
                Self::Storage(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err: AppError = StorageError::not_found("sound/x.mp3").into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_client_errors_map_to_400() {
        let err: AppError = StorageError::file_too_large(10, 5).into();
        assert_eq!(err.status_code(), 400);
        let err: AppError = StorageError::invalid_key("..").into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_backend_errors_map_to_500() {
        let err: AppError = StorageError::Operation("timeout".into()).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
