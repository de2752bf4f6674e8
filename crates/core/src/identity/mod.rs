//! Verification of ID tokens issued by a third-party identity provider.
//!
//! The backend never stores passwords. A client signs in with the provider,
//! then presents the provider's ID token to be registered or to obtain a
//! locally minted token pair.

mod firebase;

pub use firebase::FirebaseVerifier;

use async_trait::async_trait;
use thiserror::Error;
use voicereader_shared::AppError;
use voicereader_shared::error::messages;

/// A verified identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable provider user ID (`sub` claim).
    pub uid: String,
    /// Email address, if the provider shared one.
    pub email: Option<String>,
}

/// Errors that can occur while verifying an ID token.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token could not be parsed at all.
    #[error("malformed ID token: {0}")]
    Malformed(String),

    /// The token names a signing key the provider does not publish.
    #[error("unknown signing key: {0}")]
    UnknownKey(String),

    /// The token has expired.
    #[error("ID token has expired")]
    Expired,

    /// Signature, audience, issuer or subject check failed.
    #[error("invalid ID token: {0}")]
    Invalid(String),

    /// The provider's signing keys could not be fetched.
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::KeyFetch(msg) => Self::ExternalService(msg),
            _ => Self::Unauthorized(messages::INVALID_ID_TOKEN.to_string()),
        }
    }
}

/// Verifies third-party ID tokens.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifies an ID token and returns the identity it asserts.
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` if the token is not valid for this project.
    async fn verify(&self, id_token: &str) -> Result<Identity, IdentityError>;
}
