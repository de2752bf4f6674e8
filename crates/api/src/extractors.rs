//! Request extractors and path parsing helpers.

use std::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;
use voicereader_shared::AppError;

use crate::error::ApiError;

/// JSON body extractor that also runs `validator` rules.
///
/// Malformed JSON and failed validation both become a 400 with the
/// standard error body.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state).await?;
        inner.validate()?;
        Ok(Self(inner))
    }
}

/// Parses a typed ID from a path segment, failing with `message` as a 400.
pub fn parse_id<T: FromStr>(raw: &str, message: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::Validation(message.to_string())))
}
