//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// Token type advertised in token responses.
pub const BEARER: &str = "Bearer";

/// Kind of a locally minted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

/// JWT claims for locally minted tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: UserId,
    /// Unique token ID.
    pub jti: Uuid,
    /// Access or refresh.
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at timestamp.
    pub iat: i64,
    /// Not valid before timestamp.
    pub nbf: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: UserId, token_type: TokenType, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            jti: Uuid::new_v4(),
            token_type,
            iat: now,
            nbf: now,
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.sub
    }

    /// Returns true for access tokens.
    #[must_use]
    pub fn is_access(&self) -> bool {
        self.token_type == TokenType::Access
    }

    /// Returns true for refresh tokens.
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        self.token_type == TokenType::Refresh
    }
}

/// Response of a successful ID token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Always `Bearer`.
    #[serde(rename = "type")]
    pub token_type: String,
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expire_in: i64,
}

impl TokenResponse {
    /// Creates a new bearer token pair response.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expire_in: i64) -> Self {
        Self {
            token_type: BEARER.to_string(),
            access_token,
            refresh_token,
            expire_in,
        }
    }
}

/// Response of a successful refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// Always `Bearer`.
    #[serde(rename = "type")]
    pub token_type: String,
    /// New access token.
    pub access_token: String,
    /// Access token expiration in seconds.
    pub expire_in: i64,
}

impl RefreshResponse {
    /// Creates a new refresh response.
    #[must_use]
    pub fn new(access_token: String, expire_in: i64) -> Self {
        Self {
            token_type: BEARER.to_string(),
            access_token,
            expire_in,
        }
    }
}

/// Response of the debug token route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugTokenResponse {
    /// Access token for the requested user.
    pub access_token: String,
}
