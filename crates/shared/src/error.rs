//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Client-facing error messages.
pub mod messages {
    /// The question ID path parameter is not a valid ID.
    pub const INVALID_QUESTION_ID: &str = "Invalid question_id";
    /// The answer ID path parameter is not a valid ID.
    pub const INVALID_ANSWER_ID: &str = "Invalid answer_id";
    /// The user ID path parameter is not a valid ID.
    pub const INVALID_USER_ID: &str = "Invalid user_id";
    /// The requested record does not exist.
    pub const NOT_EXISTS_DATA: &str = "Not exists data";
    /// No user is registered for the presented identity.
    pub const NOT_REGISTERED_USER: &str = "Not registered user";
    /// A user is already registered for the presented identity.
    pub const ALREADY_EXISTS_USER: &str = "Already exists user";
    /// The third-party ID token could not be verified.
    pub const INVALID_ID_TOKEN: &str = "Invalid ID Token";
    /// The request body could not be understood.
    pub const INVALID_PAYLOAD: &str = "Invalid payload";
    /// The uploaded file has a disallowed extension.
    pub const UNSUPPORTED_MEDIA_TYPE: &str = "Unsupported media type";
    /// The caller is not the owner of the resource.
    pub const NOT_EQUAL_USER_ID: &str = "Not equal between request user id and token user id";
    /// A required header is missing.
    pub const MISSING_AUTHORIZATION: &str = "Authorization header is required";
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Uploaded media has a type the resource does not accept.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// File storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::UnsupportedMediaType(_) => 415,
            Self::Database(_) | Self::Storage(_) | Self::ExternalService(_) | Self::Internal(_) => {
                500
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for failures on the server side.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message that is safe to show to API clients.
    ///
    /// Server-side errors are replaced with a generic text so driver or
    /// backend details never reach the response body.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::Conflict(m)
            | Self::UnsupportedMediaType(m) => m.clone(),
            Self::Database(_) | Self::Storage(_) | Self::ExternalService(_) | Self::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(
            AppError::UnsupportedMediaType(String::new()).status_code(),
            415
        );
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Storage(String::new()).status_code(), 500);
        assert_eq!(AppError::ExternalService(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Unauthorized(String::new()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "FORBIDDEN");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::UnsupportedMediaType(String::new()).error_code(),
            "UNSUPPORTED_MEDIA_TYPE"
        );
        assert_eq!(
            AppError::Storage(String::new()).error_code(),
            "STORAGE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Unauthorized("msg".into()).to_string(),
            "Authentication failed: msg"
        );
        assert_eq!(
            AppError::UnsupportedMediaType("msg".into()).to_string(),
            "Unsupported media type: msg"
        );
        assert_eq!(
            AppError::Database("msg".into()).to_string(),
            "Database error: msg"
        );
    }

    #[test]
    fn test_client_message_hides_server_details() {
        let err = AppError::Database("connection refused on 10.0.0.3".into());
        assert!(err.is_server_error());
        assert_eq!(err.client_message(), "An internal error occurred");

        let err = AppError::NotFound(messages::NOT_EXISTS_DATA.into());
        assert!(!err.is_server_error());
        assert_eq!(err.client_message(), messages::NOT_EXISTS_DATA);
    }
}
