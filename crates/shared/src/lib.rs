//! Shared types, errors, tokens, and configuration for VoiceReader.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Offset pagination for list endpoints
//! - Application-wide error types
//! - Locally minted access/refresh tokens
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{Claims, TokenType};
pub use config::{AppConfig, IdentityConfig, JwtConfig, StorageProvider};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
