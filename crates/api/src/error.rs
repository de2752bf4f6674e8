//! HTTP error response conversion.
//!
//! Handlers return `ApiResult<T>`; anything convertible into `AppError`
//! renders as `{"error": <code>, "message": <text>}` with the matching status.

use axum::{
    Json,
    extract::multipart::MultipartError,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use voicereader_core::identity::IdentityError;
use voicereader_core::storage::StorageError;
use voicereader_db::repositories::UserError;
use voicereader_shared::AppError;
use voicereader_shared::error::messages;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper that lets `AppError` be returned from handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        Self(err.into())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Rejected JSON body");
        Self(AppError::Validation(messages::INVALID_PAYLOAD.to_string()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Rejected query string");
        Self(AppError::Validation(messages::INVALID_PAYLOAD.to_string()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(error = %err.body_text(), "Rejected multipart body");
        Self(AppError::Validation(messages::INVALID_PAYLOAD.to_string()))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        tracing::debug!(errors = %err, "Payload validation failed");
        Self(AppError::Validation(messages::INVALID_PAYLOAD.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_code = error.error_code();
    match error {
        AppError::Database(_)
        | AppError::Storage(_)
        | AppError::ExternalService(_)
        | AppError::Internal(_) => {
            tracing::error!(error = %error, error_code, "Request failed");
        }
        AppError::Unauthorized(_) | AppError::Forbidden(_) => {
            tracing::warn!(error = %error, error_code, "Request rejected");
        }
        _ => {
            tracing::debug!(error = %error, error_code, "Request rejected");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_error(&self.0);

        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.error_code(),
            message: self.0.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_client_error_body() {
        let response =
            ApiError(AppError::NotFound(messages::NOT_EXISTS_DATA.to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["message"], messages::NOT_EXISTS_DATA);
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let response = ApiError::from(DbErr::Custom("connection refused".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("connection refused"));
    }

    #[test]
    fn test_storage_not_found_is_404() {
        let err = ApiError::from(StorageError::not_found("sound/missing.mp3"));
        assert_eq!(err.0.status_code(), 404);
    }
}
