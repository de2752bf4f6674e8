//! Answer routes, nested under their question.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::questions::parse_question_id;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ValidatedJson, parse_id};
use crate::middleware::auth::AuthUser;
use crate::views::AnswerDetailView;
use voicereader_db::repositories::CreateAnswerInput;
use voicereader_db::{AnswerRepository, QuestionRepository};
use voicereader_shared::AppError;
use voicereader_shared::error::messages;
use voicereader_shared::types::{AnswerId, QuestionId};

/// Creates the answer router. Every route requires an access token.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/questions/{question_id}/answers",
            get(list_answers).post(create_answer),
        )
        .route(
            "/questions/{question_id}/answers/{answer_id}",
            get(get_answer).delete(delete_answer),
        )
}

/// Request body for posting an answer.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnswerRequest {
    /// Answer text.
    #[validate(length(min = 1))]
    pub contents: String,
}

fn parse_ids(question_id: &str, answer_id: &str) -> Result<(QuestionId, AnswerId), ApiError> {
    Ok((
        parse_question_id(question_id)?,
        parse_id(answer_id, messages::INVALID_ANSWER_ID)?,
    ))
}

async fn require_question(state: &AppState, question_id: QuestionId) -> Result<(), ApiError> {
    let exists = QuestionRepository::new((*state.db).clone())
        .exists(question_id)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()).into())
    }
}

/// GET /questions/{question_id}/answers - Answers of a question, oldest first.
async fn list_answers(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> ApiResult<Json<Vec<AnswerDetailView>>> {
    let question_id = parse_question_id(&question_id)?;
    require_question(&state, question_id).await?;

    let answers = AnswerRepository::new((*state.db).clone())
        .list_by_question(question_id)
        .await?;

    Ok(Json(answers.into_iter().map(Into::into).collect()))
}

/// POST /questions/{question_id}/answers - Answer a question.
async fn create_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(question_id): Path<String>,
    body: Result<ValidatedJson<CreateAnswerRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let question_id = parse_question_id(&question_id)?;
    let ValidatedJson(payload) = body?;
    require_question(&state, question_id).await?;

    let answer = AnswerRepository::new((*state.db).clone())
        .create(CreateAnswerInput {
            question_id,
            writer_id: auth.user_id(),
            contents: payload.contents,
        })
        .await?;

    info!(question_id = %question_id, answer_id = %answer.answer.id, "Created answer");
    Ok((StatusCode::CREATED, Json(AnswerDetailView::from(answer))))
}

/// GET /questions/{question_id}/answers/{answer_id} - Fetch one answer.
async fn get_answer(
    State(state): State<AppState>,
    Path((question_id, answer_id)): Path<(String, String)>,
) -> ApiResult<Json<AnswerDetailView>> {
    let (question_id, answer_id) = parse_ids(&question_id, &answer_id)?;

    let answer = AnswerRepository::new((*state.db).clone())
        .find_by_id(question_id, answer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()))?;

    Ok(Json(answer.into()))
}

/// DELETE /questions/{question_id}/answers/{answer_id} - Delete one of the
/// caller's answers.
async fn delete_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((question_id, answer_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let (question_id, answer_id) = parse_ids(&question_id, &answer_id)?;
    let repo = AnswerRepository::new((*state.db).clone());

    let answer = repo
        .find_by_id(question_id, answer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()))?;

    if answer.answer.writer_id != auth.user_id().into_inner() {
        return Err(AppError::Forbidden(messages::NOT_EQUAL_USER_ID.to_string()).into());
    }

    repo.delete(question_id, answer_id).await?;

    info!(question_id = %question_id, answer_id = %answer_id, "Deleted answer");
    Ok(StatusCode::NO_CONTENT)
}
