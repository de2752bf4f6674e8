//! Blob storage for uploaded resources using Apache OpenDAL.
//!
//! One contract, two backends:
//! - Local filesystem
//! - S3-compatible object storage (AWS S3, Cloudflare R2, MinIO)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      StorageService                              │
//! │        save(prefix, name, bytes)   fetch(prefix, name)           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                      Apache OpenDAL                              │
//! │ op.write("prefix/name", data)   │ op.read("prefix/name")         │
//! │ op.delete("prefix/name")        │ op.stat("prefix/name")         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::StorageConfig;
pub use error::StorageError;
pub use service::{StorageService, StoredObject};
pub use voicereader_shared::StorageProvider;

/// Prefix under which question audio is stored.
pub const SOUND_PREFIX: &str = "sound";

/// Prefix under which user photos are stored.
pub const PHOTO_PREFIX: &str = "user-picture";

/// Photo served to users who have not uploaded one.
pub const DEFAULT_PICTURE: &str = "default_user_profile.png";
