//! Core services for VoiceReader.
//!
//! This crate has no database or web framework dependencies.
//!
//! # Modules
//!
//! - `storage` - Blob storage over local disk or S3-compatible object storage
//! - `media` - Upload file-type rules
//! - `identity` - Verification of third-party identity provider ID tokens

pub mod identity;
pub mod media;
pub mod storage;
