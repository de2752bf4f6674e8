//! Shared setup for repository integration tests.

#![allow(dead_code)]

use sea_orm::DatabaseConnection;
use voicereader_db::migration::{Migrator, MigratorTrait};
use voicereader_db::repositories::CreateUserInput;
use voicereader_db::{UserRepository, entities::users};
use voicereader_shared::config::DatabaseConfig;

/// Fresh in-memory database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = voicereader_db::connect(&config)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

/// Registers a user with a unique uid.
pub async fn create_user(db: &DatabaseConnection, display_name: &str) -> users::Model {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            display_name: display_name.to_string(),
            email: Some(format!("{display_name}@example.com")),
            fcm_uid: format!("uid-{}", uuid::Uuid::new_v4()),
            picture: "http://localhost/default.png".to_string(),
        })
        .await
        .expect("Failed to create user")
}
