//! Shared harness for API tests.
//!
//! Each test gets a fresh in-memory database, a temp-dir storage root and a
//! stub identity verifier that accepts tokens of the form `valid-<uid>`.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use voicereader_api::{AppState, create_router};
use voicereader_core::identity::{Identity, IdentityError, IdentityVerifier};
use voicereader_core::storage::{StorageConfig, StorageService};
use voicereader_shared::config::{
    AppConfig, AppSettings, DatabaseConfig, IdentityConfig, JwtConfig, ServerConfig,
};
use voicereader_shared::{JwtService, StorageProvider};

pub const PUBLIC_URL: &str = "http://voicereader.test";
pub const BOUNDARY: &str = "voicereader-test-boundary";

/// Accepts `valid-<uid>` and rejects everything else.
pub struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, id_token: &str) -> Result<Identity, IdentityError> {
        let uid = id_token
            .strip_prefix("valid-")
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| IdentityError::Invalid("stub rejected token".to_string()))?;

        Ok(Identity {
            uid: uid.to_string(),
            email: Some(format!("{uid}@example.com")),
        })
    }
}

/// A response with its body collected.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("response body is UTF-8")
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// A registered user with a valid access token.
pub struct TestUser {
    pub id: String,
    pub uid: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub storage_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let storage_dir = tempfile::tempdir().expect("temp dir");

        let config = AppConfig {
            server: ServerConfig {
                public_url: PUBLIC_URL.to_string(),
                max_upload_bytes: 1024 * 1024,
                ..ServerConfig::default()
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            jwt: JwtConfig {
                secret: "TEST KEY".to_string(),
                ..JwtConfig::default()
            },
            storage: StorageProvider::local_fs(storage_dir.path().join("upload")),
            identity: IdentityConfig {
                project_id: "voicereader-test".to_string(),
                jwks_url: "http://127.0.0.1:9/jwks".to_string(),
                issuer_prefix: "https://securetoken.google.com/".to_string(),
                key_cache_ttl_secs: 60,
            },
            app: AppSettings {
                env: "testing".to_string(),
                debug_routes: true,
                ..AppSettings::default()
            },
        };

        let db = voicereader_db::connect_and_migrate(&config.database)
            .await
            .expect("database");
        let storage = StorageService::from_config(StorageConfig::new(config.storage.clone()))
            .expect("storage");

        let state = AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            storage: Arc::new(storage),
            identity: Arc::new(StubVerifier),
            config: Arc::new(config),
        };

        Self {
            router: create_router(state.clone()),
            state,
            storage_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, auth: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, auth, Body::empty(), None))
            .await
    }

    pub async fn delete(&self, uri: &str, auth: Option<&str>) -> TestResponse {
        self.send(request(Method::DELETE, uri, auth, Body::empty(), None))
            .await
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: &Value,
    ) -> TestResponse {
        self.send(request(
            method,
            uri,
            auth,
            Body::from(body.to_string()),
            Some("application/json"),
        ))
        .await
    }

    pub async fn send_multipart(
        &self,
        uri: &str,
        auth: Option<&str>,
        parts: &[Part<'_>],
    ) -> TestResponse {
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        self.send(request(
            Method::POST,
            uri,
            auth,
            Body::from(multipart_body(parts)),
            Some(&content_type),
        ))
        .await
    }

    /// Registers `uid` and exchanges its ID token for a token pair.
    pub async fn register(&self, uid: &str, display_name: &str) -> TestUser {
        let id_token = format!("valid-{uid}");
        let created = self
            .send_json(
                Method::POST,
                "/api/v1/users",
                Some(&id_token),
                &serde_json::json!({ "display_name": display_name }),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.text());

        let tokens = self.get("/api/v1/oauth2/token", Some(&id_token)).await;
        assert_eq!(tokens.status, StatusCode::OK, "{}", tokens.text());
        let tokens = tokens.json();

        TestUser {
            id: created.json()["_id"].as_str().expect("user id").to_string(),
            uid: uid.to_string(),
            access_token: tokens["access_token"].as_str().expect("access").to_string(),
            refresh_token: tokens["refresh_token"].as_str().expect("refresh").to_string(),
        }
    }

    /// Posts a question with an mp3 attachment and returns its JSON.
    pub async fn create_question(&self, user: &TestUser, title: &str) -> Value {
        let response = self
            .send_multipart(
                "/api/v1/questions",
                Some(&user.bearer()),
                &[
                    Part::text("title", title),
                    Part::text("contents", "test contents"),
                    Part::text("subtitles", "test subtitles"),
                    Part::file("sound", "voice.mp3", "audio/mpeg", b"ID3-sound-bytes"),
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }
}

pub fn request(
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Body,
    content_type: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(body).expect("valid request")
}

/// One multipart form field.
pub struct Part<'a> {
    name: &'a str,
    file: Option<(&'a str, &'a str)>,
    data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file: None,
            data: value.as_bytes(),
        }
    }

    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file: Some((file_name, content_type)),
            data,
        }
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: {content_type}\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
