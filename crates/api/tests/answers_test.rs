//! Answers nested under questions.

mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, TestUser};
use serde_json::{Value, json};

async fn answer(app: &TestApp, user: &TestUser, question_id: &str, contents: &str) -> Value {
    let response = app
        .send_json(
            Method::POST,
            &format!("/api/v1/questions/{question_id}/answers"),
            Some(&user.bearer()),
            &json!({ "contents": contents }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    response.json()
}

#[tokio::test]
async fn test_create_answer() {
    let app = TestApp::new().await;
    let asker = app.register("uid-q", "Asker").await;
    let helper = app.register("uid-a", "Helper").await;
    let question = app.create_question(&asker, "Help?").await;
    let question_id = question["_id"].as_str().unwrap();

    let created = answer(&app, &helper, question_id, "Like this.").await;

    assert_eq!(created["contents"], "Like this.");
    assert_eq!(created["question_id"], question_id);
    assert_eq!(created["writer_id"], helper.id.as_str());
    assert_eq!(created["writer"]["display_name"], "Helper");

    let detail = app
        .get(&format!("/api/v1/questions/{question_id}"), Some(&asker.bearer()))
        .await
        .json();
    assert_eq!(detail["num_of_answers"], 1);
}

#[tokio::test]
async fn test_create_answer_rejections() {
    let app = TestApp::new().await;
    let user = app.register("uid-rejected", "Rejected").await;
    let question = app.create_question(&user, "Q").await;
    let question_id = question["_id"].as_str().unwrap();

    let empty = app
        .send_json(
            Method::POST,
            &format!("/api/v1/questions/{question_id}/answers"),
            Some(&user.bearer()),
            &json!({ "contents": "" }),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let bad_question = app
        .send_json(
            Method::POST,
            "/api/v1/questions/nope/answers",
            Some(&user.bearer()),
            &json!({ "contents": "hello" }),
        )
        .await;
    assert_eq!(bad_question.status, StatusCode::BAD_REQUEST);

    let unknown_question = app
        .send_json(
            Method::POST,
            &format!("/api/v1/questions/{}/answers", uuid::Uuid::now_v7()),
            Some(&user.bearer()),
            &json!({ "contents": "hello" }),
        )
        .await;
    assert_eq!(unknown_question.status, StatusCode::NOT_FOUND);

    let anonymous = app
        .send_json(
            Method::POST,
            &format!("/api/v1/questions/{question_id}/answers"),
            None,
            &json!({ "contents": "hello" }),
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_answers_oldest_first() {
    let app = TestApp::new().await;
    let user = app.register("uid-thread", "Thread").await;
    let question = app.create_question(&user, "Thread").await;
    let question_id = question["_id"].as_str().unwrap();
    for contents in ["one", "two", "three"] {
        answer(&app, &user, question_id, contents).await;
    }

    let response = app
        .get(
            &format!("/api/v1/questions/{question_id}/answers"),
            Some(&user.bearer()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let contents: Vec<String> = response
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["contents"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(contents, ["one", "two", "three"]);
}

#[tokio::test]
async fn test_list_answers_of_unknown_question() {
    let app = TestApp::new().await;
    let user = app.register("uid-nothing", "Nothing").await;

    let response = app
        .get(
            &format!("/api/v1/questions/{}/answers", uuid::Uuid::now_v7()),
            Some(&user.bearer()),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_answer() {
    let app = TestApp::new().await;
    let user = app.register("uid-single", "Single").await;
    let question = app.create_question(&user, "Q").await;
    let question_id = question["_id"].as_str().unwrap();
    let created = answer(&app, &user, question_id, "only one").await;
    let answer_id = created["_id"].as_str().unwrap();

    let found = app
        .get(
            &format!("/api/v1/questions/{question_id}/answers/{answer_id}"),
            Some(&user.bearer()),
        )
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.json()["contents"], "only one");

    let bad = app
        .get(
            &format!("/api/v1/questions/{question_id}/answers/xyz"),
            Some(&user.bearer()),
        )
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .get(
            &format!(
                "/api/v1/questions/{question_id}/answers/{}",
                uuid::Uuid::now_v7()
            ),
            Some(&user.bearer()),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_answer_is_scoped_to_its_question() {
    let app = TestApp::new().await;
    let user = app.register("uid-scope", "Scope").await;
    let first = app.create_question(&user, "First").await;
    let second = app.create_question(&user, "Second").await;
    let created = answer(&app, &user, first["_id"].as_str().unwrap(), "on first").await;

    let response = app
        .get(
            &format!(
                "/api/v1/questions/{}/answers/{}",
                second["_id"].as_str().unwrap(),
                created["_id"].as_str().unwrap()
            ),
            Some(&user.bearer()),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_answer() {
    let app = TestApp::new().await;
    let asker = app.register("uid-del-q", "Asker").await;
    let helper = app.register("uid-del-a", "Helper").await;
    let question = app.create_question(&asker, "Q").await;
    let question_id = question["_id"].as_str().unwrap();
    let created = answer(&app, &helper, question_id, "oops").await;
    let uri = format!(
        "/api/v1/questions/{question_id}/answers/{}",
        created["_id"].as_str().unwrap()
    );

    let foreign = app.delete(&uri, Some(&asker.bearer())).await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let deleted = app.delete(&uri, Some(&helper.bearer())).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.get(&uri, Some(&helper.bearer())).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
