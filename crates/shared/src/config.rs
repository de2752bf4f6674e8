//! Application configuration management.
//!
//! Sources are layered in order, later ones overriding earlier ones:
//! `config/default.*`, `config/{RUN_MODE}.*`, then `VOICEREADER__*`
//! environment variables (`__` separates nested keys).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "VOICEREADER";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// File storage configuration.
    pub storage: StorageProvider,
    /// Identity provider configuration.
    pub identity: IdentityConfig,
    /// General application settings.
    #[serde(default)]
    pub app: AppSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally visible base URL, used to build asset URLs.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Maximum accepted request body size for uploads.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expiry_secs: default_access_token_expiry(),
            refresh_token_expiry_secs: default_refresh_token_expiry(),
        }
    }
}

fn default_access_token_expiry() -> u64 {
    86_400 // 1 day
}

fn default_refresh_token_expiry() -> u64 {
    2_592_000 // 30 days
}

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible object storage: AWS S3, Cloudflare R2, MinIO.
    S3 {
        /// Bucket name.
        bucket: String,
        /// Bucket region.
        region: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Custom endpoint for non-AWS providers.
        #[serde(default)]
        endpoint: Option<String>,
    },
    /// Local filesystem.
    LocalFs {
        /// Root directory for uploaded resources.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Creates an S3 provider against the default AWS endpoint.
    #[must_use]
    pub fn s3(
        bucket: impl Into<String>,
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            region: region.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            endpoint: None,
        }
    }

    /// Creates a local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Short provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Third-party identity provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Project the ID tokens are issued for (expected audience).
    pub project_id: String,
    /// JWKS endpoint publishing the provider's signing keys.
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    /// Issuer prefix; the project ID is appended to it.
    #[serde(default = "default_issuer_prefix")]
    pub issuer_prefix: String,
    /// How long fetched signing keys are cached.
    #[serde(default = "default_key_cache_ttl")]
    pub key_cache_ttl_secs: u64,
}

impl IdentityConfig {
    /// Expected `iss` claim of ID tokens.
    #[must_use]
    pub fn issuer(&self) -> String {
        format!("{}{}", self.issuer_prefix, self.project_id)
    }
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

fn default_issuer_prefix() -> String {
    "https://securetoken.google.com/".to_string()
}

fn default_key_cache_ttl() -> u64 {
    3600
}

/// General application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// Deployment environment name reported by `/api/info/env`.
    #[serde(default = "default_env")]
    pub env: String,
    /// API version reported by `/api/info/version`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Enables the unauthenticated debug routes.
    #[serde(default)]
    pub debug_routes: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            env: default_env(),
            api_version: default_api_version(),
            debug_routes: false,
        }
    }
}

fn default_env() -> String {
    "development".to_string()
}

fn default_api_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl AppConfig {
    /// Loads configuration from `./config` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Loads configuration from the given directory and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file is malformed or a required key is missing.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .set_default("app.env", run_mode.as_str())?
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
