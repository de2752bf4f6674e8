//! Integration tests for Answer repository.

mod common;

use voicereader_db::repositories::{CreateAnswerInput, CreateQuestionInput};
use voicereader_db::{AnswerRepository, QuestionRepository};
use voicereader_shared::types::{AnswerId, QuestionId, UserId};

use common::{create_user, setup_db};

async fn create_question(db: &sea_orm::DatabaseConnection, writer: UserId) -> QuestionId {
    let id = QuestionId::new();
    QuestionRepository::new(db.clone())
        .create(CreateQuestionInput {
            id,
            writer_id: writer,
            title: "title".to_string(),
            contents: "contents".to_string(),
            subtitles: "subtitles".to_string(),
            sound_url: "http://localhost/sound.mp3".to_string(),
        })
        .await
        .unwrap();
    id
}

fn answer(question_id: QuestionId, writer_id: UserId, contents: &str) -> CreateAnswerInput {
    CreateAnswerInput {
        question_id,
        writer_id,
        contents: contents.to_string(),
    }
}

#[tokio::test]
async fn test_create_and_find_answer() {
    let db = setup_db().await;
    let writer = create_user(&db, "writer").await;
    let writer_id = UserId::from_uuid(writer.id);
    let question_id = create_question(&db, writer_id).await;
    let repo = AnswerRepository::new(db);

    let created = repo
        .create(answer(question_id, writer_id, "test answer"))
        .await
        .unwrap();
    assert_eq!(created.answer.contents, "test answer");
    assert_eq!(created.writer.as_ref().map(|w| w.id), Some(writer.id));

    let answer_id = AnswerId::from_uuid(created.answer.id);
    let found = repo
        .find_by_id(question_id, answer_id)
        .await
        .unwrap()
        .expect("answer exists");
    assert_eq!(found.answer, created.answer);
}

#[tokio::test]
async fn test_find_answer_under_other_question() {
    let db = setup_db().await;
    let writer_id = UserId::from_uuid(create_user(&db, "writer").await.id);
    let first = create_question(&db, writer_id).await;
    let second = create_question(&db, writer_id).await;
    let repo = AnswerRepository::new(db);

    let created = repo.create(answer(first, writer_id, "x")).await.unwrap();
    let answer_id = AnswerId::from_uuid(created.answer.id);

    assert!(repo.find_by_id(second, answer_id).await.unwrap().is_none());
    assert!(!repo.delete(second, answer_id).await.unwrap());
}

#[tokio::test]
async fn test_list_by_question_oldest_first() {
    let db = setup_db().await;
    let alice = UserId::from_uuid(create_user(&db, "alice").await.id);
    let bob = UserId::from_uuid(create_user(&db, "bob").await.id);
    let question_id = create_question(&db, alice).await;
    let repo = AnswerRepository::new(db);

    repo.create(answer(question_id, bob, "first")).await.unwrap();
    repo.create(answer(question_id, alice, "second")).await.unwrap();
    repo.create(answer(question_id, bob, "third")).await.unwrap();

    let listed = repo.list_by_question(question_id).await.unwrap();
    let contents: Vec<_> = listed.iter().map(|a| a.answer.contents.as_str()).collect();
    assert_eq!(contents, ["first", "second", "third"]);
    assert!(listed.iter().all(|a| a.writer.is_some()));

    let by_bob = repo.list_by_writer(bob).await.unwrap();
    let contents: Vec<_> = by_bob.iter().map(|a| a.contents.as_str()).collect();
    assert_eq!(contents, ["third", "first"]);
}

#[tokio::test]
async fn test_delete_answer() {
    let db = setup_db().await;
    let writer_id = UserId::from_uuid(create_user(&db, "writer").await.id);
    let question_id = create_question(&db, writer_id).await;
    let repo = AnswerRepository::new(db);

    let created = repo
        .create(answer(question_id, writer_id, "bye"))
        .await
        .unwrap();
    let answer_id = AnswerId::from_uuid(created.answer.id);

    assert!(repo.delete(question_id, answer_id).await.unwrap());
    assert!(repo.find_by_id(question_id, answer_id).await.unwrap().is_none());
    assert!(!repo.delete(question_id, answer_id).await.unwrap());
}
