//! Question routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use bytes::Bytes;
use tracing::{info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::parse_id;
use crate::middleware::auth::AuthUser;
use crate::views::{QuestionDetailView, QuestionView};
use voicereader_core::media::{SOUND_EXTENSIONS, allowed_extension, content_type_for};
use voicereader_core::storage::SOUND_PREFIX;
use voicereader_db::QuestionRepository;
use voicereader_db::repositories::CreateQuestionInput;
use voicereader_shared::AppError;
use voicereader_shared::error::messages;
use voicereader_shared::types::{OffsetRequest, QuestionId};

/// Routes that need no token.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/questions/sound/{filename}", get(get_sound))
}

/// Routes that require an access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route(
            "/questions/{question_id}",
            get(get_question).delete(delete_question),
        )
}

/// Parses a question ID path segment.
pub(crate) fn parse_question_id(raw: &str) -> Result<QuestionId, ApiError> {
    parse_id(raw, messages::INVALID_QUESTION_ID)
}

/// Last path segment of a URL or storage key.
fn file_name_of(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// GET /questions - Newest questions first.
async fn list_questions(
    State(state): State<AppState>,
    query: Result<Query<OffsetRequest>, QueryRejection>,
) -> ApiResult<Json<Vec<QuestionDetailView>>> {
    let Query(page) = query?;

    let questions = QuestionRepository::new((*state.db).clone())
        .list(page.offset(), page.limit())
        .await?;

    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

/// Fields of a question upload.
#[derive(Debug, Default)]
struct QuestionForm {
    sound: Option<(String, Bytes)>,
    title: Option<String>,
    contents: Option<String>,
    subtitles: Option<String>,
}

impl QuestionForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "sound" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    form.sound = Some((file_name, field.bytes().await?));
                }
                "title" => form.title = Some(field.text().await?),
                "contents" => form.contents = Some(field.text().await?),
                "subtitles" => form.subtitles = Some(field.text().await?),
                _ => {}
            }
        }
        Ok(form)
    }
}

/// POST /questions - Upload a recorded question.
async fn create_question(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form = QuestionForm::read(multipart).await?;
    let (Some((sound_name, sound)), Some(title), Some(contents), Some(subtitles)) =
        (form.sound, form.title, form.contents, form.subtitles)
    else {
        return Err(AppError::Validation(messages::INVALID_PAYLOAD.to_string()).into());
    };

    let extension = allowed_extension(&sound_name, SOUND_EXTENSIONS).ok_or_else(|| {
        AppError::UnsupportedMediaType(messages::UNSUPPORTED_MEDIA_TYPE.to_string())
    })?;

    let question_id = QuestionId::new();
    let file_name = format!("{question_id}.{extension}");
    state
        .storage
        .save(SOUND_PREFIX, &file_name, sound, content_type_for(&file_name))
        .await?;

    let created = QuestionRepository::new((*state.db).clone())
        .create(CreateQuestionInput {
            id: question_id,
            writer_id: auth.user_id(),
            title,
            contents,
            subtitles,
            sound_url: state.api_url(&format!("questions/sound/{file_name}")),
        })
        .await;
    let question = match created {
        Ok(question) => question,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(SOUND_PREFIX, &file_name).await {
                warn!(error = %cleanup, file_name = %file_name, "Failed to remove orphaned sound");
            }
            return Err(e.into());
        }
    };

    info!(question_id = %question_id, writer_id = %auth.user_id(), "Created question");
    Ok((StatusCode::CREATED, Json(QuestionView::from(question))))
}

/// GET /questions/{question_id} - Fetch a question and mark it read.
async fn get_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(question_id): Path<String>,
) -> ApiResult<Json<QuestionDetailView>> {
    let question_id = parse_question_id(&question_id)?;
    let repo = QuestionRepository::new((*state.db).clone());

    let question = repo
        .find_by_id(question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()))?;

    // The returned view shows the count from before this read.
    repo.add_read(question_id, auth.user_id()).await?;

    Ok(Json(question.into()))
}

/// DELETE /questions/{question_id} - Delete one of the caller's questions.
async fn delete_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(question_id): Path<String>,
) -> ApiResult<StatusCode> {
    let question_id = parse_question_id(&question_id)?;
    let repo = QuestionRepository::new((*state.db).clone());

    let question = repo
        .find_by_id(question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()))?;

    if question.question.writer_id != auth.user_id().into_inner() {
        return Err(AppError::Forbidden(messages::NOT_EQUAL_USER_ID.to_string()).into());
    }

    repo.delete(question_id).await?;

    let sound_file = file_name_of(&question.question.sound_url);
    if let Err(e) = state.storage.delete(SOUND_PREFIX, sound_file).await {
        warn!(question_id = %question_id, error = %e, "Failed to delete question sound");
    }

    info!(question_id = %question_id, "Deleted question");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /questions/sound/{filename} - Download a question's audio.
async fn get_sound(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let object = state.storage.fetch(SOUND_PREFIX, &filename).await?;
    let disposition = format!("attachment; filename=\"{}\"", file_name_of(&object.key));

    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        object.bytes,
    ))
}
