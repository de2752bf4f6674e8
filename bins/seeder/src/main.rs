//! Development data seeder for VoiceReader.
//!
//! Uploads the default profile photo, registers a development user and gives
//! it one question with an answer, then prints an access token for that user.
//! Running it again only refreshes the photo and the token.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use bytes::Bytes;
use sea_orm::DatabaseConnection;
use voicereader_core::media::content_type_for;
use voicereader_core::storage::{
    DEFAULT_PICTURE, PHOTO_PREFIX, SOUND_PREFIX, StorageConfig, StorageService,
};
use voicereader_db::repositories::{CreateAnswerInput, CreateQuestionInput, CreateUserInput};
use voicereader_db::{AnswerRepository, QuestionRepository, UserRepository};
use voicereader_shared::types::{QuestionId, UserId};
use voicereader_shared::{AppConfig, JwtService};

/// Identity provider UID of the development user.
const DEV_FCM_UID: &str = "dev-seed-user";

const DEFAULT_PICTURE_BYTES: &[u8] = include_bytes!("../../../assets/default_user_profile.png");

/// An ID3 header with no frames; enough for clients to fetch.
const PLACEHOLDER_SOUND: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = voicereader_db::connect_and_migrate(&config.database)
        .await
        .context("failed to connect to database")?;
    let storage = StorageService::from_config(StorageConfig::new(config.storage.clone()))?;
    let base_url = format!("{}/api/v1", config.server.public_url.trim_end_matches('/'));

    println!("Uploading default profile photo...");
    storage
        .save(
            PHOTO_PREFIX,
            DEFAULT_PICTURE,
            Bytes::from_static(DEFAULT_PICTURE_BYTES),
            content_type_for(DEFAULT_PICTURE),
        )
        .await?;

    let users = UserRepository::new(db.clone());
    let user_id = if let Some(id) = users.find_id_by_fcm_uid(DEV_FCM_UID).await? {
        println!("  Development user already exists, skipping...");
        id
    } else {
        println!("Seeding development user...");
        let user = users
            .create(CreateUserInput {
                display_name: "Dev User".to_string(),
                email: Some("dev@voicereader.local".to_string()),
                fcm_uid: DEV_FCM_UID.to_string(),
                picture: format!("{base_url}/users/00/photo/{DEFAULT_PICTURE}"),
            })
            .await?;
        let user_id = UserId::from_uuid(user.id);

        println!("Seeding sample question...");
        seed_question(&db, &storage, &base_url, user_id).await?;
        user_id
    };

    let token = JwtService::new(config.jwt.clone()).generate_access_token(user_id)?;
    println!("Seeding complete!");
    println!("  user_id:      {user_id}");
    println!("  access_token: {token}");

    Ok(())
}

async fn seed_question(
    db: &DatabaseConnection,
    storage: &StorageService,
    base_url: &str,
    writer_id: UserId,
) -> anyhow::Result<()> {
    let question_id = QuestionId::new();
    let file_name = format!("{question_id}.mp3");
    storage
        .save(
            SOUND_PREFIX,
            &file_name,
            Bytes::from_static(PLACEHOLDER_SOUND),
            content_type_for(&file_name),
        )
        .await?;

    QuestionRepository::new(db.clone())
        .create(CreateQuestionInput {
            id: question_id,
            writer_id,
            title: "How do I pronounce \"squirrel\"?".to_string(),
            contents: "I always get stuck on the r and l at the end.".to_string(),
            subtitles: "how do I pronounce squirrel".to_string(),
            sound_url: format!("{base_url}/questions/sound/{file_name}"),
        })
        .await?;

    AnswerRepository::new(db.clone())
        .create(CreateAnswerInput {
            question_id,
            writer_id,
            contents: "Try SKWUR-uhl, two syllables.".to_string(),
        })
        .await?;

    Ok(())
}
