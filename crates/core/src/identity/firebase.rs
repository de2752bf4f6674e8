//! Firebase Authentication ID token verification.
//!
//! ID tokens are RS256 JWTs. The signing key is picked by the `kid` header
//! from the provider's published JWKS. The whole key set is cached for a
//! configurable TTL; an unknown `kid` triggers at most one refetch per
//! minimum refresh interval, and concurrent misses share a single fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, warn};
use voicereader_shared::IdentityConfig;

use super::{Identity, IdentityError, IdentityVerifier};

/// Default minimum age of the cached key set before an unknown `kid` may
/// trigger a refetch.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// JSON Web Key Set.
#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

/// A single JSON Web Key. Only RSA keys are used.
#[derive(Debug, Deserialize)]
struct Jwk {
    kty: String,
    kid: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

/// Decoding keys from one JWKS fetch.
struct KeySet {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// Claims read from a verified ID token.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// Verifies Firebase ID tokens against the project's audience and issuer.
pub struct FirebaseVerifier {
    client: reqwest::Client,
    jwks_url: String,
    audience: String,
    issuer: String,
    key_set: Cache<(), Arc<KeySet>>,
    min_refresh_interval: Duration,
}

impl std::fmt::Debug for FirebaseVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseVerifier")
            .field("jwks_url", &self.jwks_url)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("min_refresh_interval", &self.min_refresh_interval)
            .finish_non_exhaustive()
    }
}

impl FirebaseVerifier {
    /// Creates a verifier for the configured project.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Creates a verifier that fetches keys with the given HTTP client.
    #[must_use]
    pub fn with_client(config: &IdentityConfig, client: reqwest::Client) -> Self {
        let key_set = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(config.key_cache_ttl_secs))
            .build();

        Self {
            client,
            jwks_url: config.jwks_url.clone(),
            audience: config.project_id.clone(),
            issuer: config.issuer(),
            key_set,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
        }
    }

    /// Sets how old the cached key set must be before an unknown `kid`
    /// may trigger a refetch.
    #[must_use]
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    async fn fetch_key_set(&self) -> Result<Arc<KeySet>, String> {
        let jwks = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| e.to_string())?
            .json::<Jwks>()
            .await
            .map_err(|e| e.to_string())?;
        debug!(count = jwks.keys.len(), "Fetched identity provider signing keys");

        let mut keys = HashMap::with_capacity(jwks.keys.len());
        for jwk in &jwks.keys {
            let Some(key_id) = jwk.kid.as_deref() else {
                continue;
            };
            match jwk_to_decoding_key(jwk) {
                Ok(key) => {
                    keys.insert(key_id.to_string(), key);
                }
                Err(e) => warn!(kid = key_id, error = %e, "Skipping unusable signing key"),
            }
        }

        Ok(Arc::new(KeySet {
            keys,
            fetched_at: Instant::now(),
        }))
    }

    /// Returns the cached key set, fetching it once for all waiting callers.
    async fn cached_key_set(&self) -> Result<Arc<KeySet>, IdentityError> {
        self.key_set
            .try_get_with((), self.fetch_key_set())
            .await
            .map_err(|e| IdentityError::KeyFetch((*e).clone()))
    }

    /// Returns the decoding key for `kid`.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        let set = self.cached_key_set().await?;
        if let Some(key) = set.keys.get(kid) {
            return Ok(key.clone());
        }

        if set.fetched_at.elapsed() < self.min_refresh_interval {
            return Err(IdentityError::UnknownKey(kid.to_string()));
        }

        // The provider may have rotated its keys. Only drop the set we looked
        // at, so a set refreshed by a concurrent caller is kept.
        if let Some(current) = self.key_set.get(&()).await {
            if Arc::ptr_eq(&current, &set) {
                self.key_set.invalidate(&()).await;
            }
        }

        let set = self.cached_key_set().await?;
        set.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| IdentityError::UnknownKey(kid.to_string()))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);
        validation
    }
}

fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, IdentityError> {
    if jwk.kty != "RSA" {
        return Err(IdentityError::Invalid(format!(
            "unsupported key type: {}",
            jwk.kty
        )));
    }
    let n = jwk
        .n
        .as_deref()
        .ok_or_else(|| IdentityError::Invalid("RSA key missing modulus".to_string()))?;
    let e = jwk
        .e
        .as_deref()
        .ok_or_else(|| IdentityError::Invalid("RSA key missing exponent".to_string()))?;

    DecodingKey::from_rsa_components(n, e).map_err(|e| IdentityError::Invalid(e.to_string()))
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, id_token: &str) -> Result<Identity, IdentityError> {
        let header = decode_header(id_token).map_err(|e| IdentityError::Malformed(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(IdentityError::Invalid(format!(
                "unsupported algorithm: {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::Malformed("missing kid header".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let claims = decode::<IdTokenClaims>(id_token, &key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "ID token validation failed");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::Expired,
                    _ => IdentityError::Invalid(e.to_string()),
                }
            })?;

        if claims.sub.is_empty() {
            return Err(IdentityError::Invalid("empty subject".to_string()));
        }

        Ok(Identity {
            uid: claims.sub,
            email: claims.email,
        })
    }
}

#[cfg(test)]
#[path = "firebase_tests.rs"]
mod tests;
