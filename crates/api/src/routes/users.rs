//! User routes: registration, profile CRUD and profile photos.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{ValidatedJson, parse_id};
use crate::middleware::auth::{AuthUser, authorization_header, extract_bearer_token};
use crate::views::{AnswerView, QuestionDetailView, UserView};
use crate::AppState;
use voicereader_core::media::{PHOTO_EXTENSIONS, allowed_extension, content_type_for};
use voicereader_core::storage::{DEFAULT_PICTURE, PHOTO_PREFIX};
use voicereader_db::repositories::{CreateUserInput, UpdateUserInput};
use voicereader_db::{AnswerRepository, QuestionRepository, UserRepository};
use voicereader_shared::AppError;
use voicereader_shared::error::messages;
use voicereader_shared::types::UserId;

/// Routes that authenticate with an ID token or need no token at all.
pub fn public_routes(debug_routes: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/users", post(create_user))
        .route("/users/{user_id}/photo/{file_name}", get(get_photo));

    if debug_routes {
        router.route("/users/debug", get(list_users))
    } else {
        router
    }
}

/// Routes that require an access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{user_id}/questions", get(list_user_questions))
        .route("/users/{user_id}/answers", get(list_user_answers))
        .route("/users/{user_id}/photo", post(upload_photo))
}

/// Request body for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    /// Picture URL; the default picture is used when absent.
    pub picture: Option<String>,
}

/// Request body for profile updates. Absent fields are left untouched.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// New picture URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub picture: Option<String>,
}

impl From<&UpdateUserRequest> for UpdateUserInput {
    fn from(req: &UpdateUserRequest) -> Self {
        Self {
            display_name: req.display_name.clone(),
            email: req.email.clone(),
            picture: req.picture.clone(),
        }
    }
}

/// Response of a photo upload.
#[derive(Debug, Serialize)]
pub struct PictureResponse {
    /// URL of the stored photo.
    pub picture: String,
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    parse_id(raw, messages::INVALID_USER_ID)
}

fn require_self(auth: &AuthUser, user_id: UserId) -> Result<(), ApiError> {
    if auth.user_id() == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(messages::NOT_EQUAL_USER_ID.to_string()).into())
    }
}

/// POST /users - Register the identity behind an ID token.
async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<ValidatedJson<CreateUserRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let header = authorization_header(&headers)
        .ok_or_else(|| AppError::Unauthorized(messages::INVALID_ID_TOKEN.to_string()))?;
    let id_token = extract_bearer_token(header).unwrap_or(header);
    let identity = state.identity.verify(id_token).await?;

    let ValidatedJson(payload) = body?;
    let picture = payload
        .picture
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| state.api_url(&format!("users/00/photo/{DEFAULT_PICTURE}")));

    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            display_name: payload.display_name,
            email: identity.email,
            fcm_uid: identity.uid,
            picture,
        })
        .await?;

    info!(user_id = %user.id, "Registered user");
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// GET /users/{user_id} - Fetch a user.
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserView>> {
    let user_id = parse_user_id(&user_id)?;

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()))?;

    Ok(Json(user.into()))
}

/// PUT /users/{user_id} - Update the caller's profile.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    body: Result<ValidatedJson<UpdateUserRequest>, ApiError>,
) -> ApiResult<Json<UpdateUserRequest>> {
    let user_id = parse_user_id(&user_id)?;
    require_self(&auth, user_id)?;

    let ValidatedJson(payload) = body?;
    let input = UpdateUserInput::from(&payload);
    if input.is_empty() {
        return Err(AppError::Validation(messages::INVALID_PAYLOAD.to_string()).into());
    }

    UserRepository::new((*state.db).clone())
        .update(user_id, input)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()))?;

    info!(user_id = %user_id, "Updated user");
    Ok(Json(payload))
}

/// DELETE /users/{user_id} - Delete the caller's account.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    let user_id = parse_user_id(&user_id)?;
    require_self(&auth, user_id)?;

    let deleted = UserRepository::new((*state.db).clone())
        .delete(user_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()).into());
    }

    info!(user_id = %user_id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{user_id}/questions - Questions written by the caller.
async fn list_user_questions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<QuestionDetailView>>> {
    let user_id = parse_user_id(&user_id)?;
    require_self(&auth, user_id)?;

    // A valid token for a deleted account is still refused here.
    UserRepository::new((*state.db).clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden(messages::NOT_EQUAL_USER_ID.to_string()))?;

    let questions = QuestionRepository::new((*state.db).clone())
        .list_by_writer(user_id)
        .await?;

    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

/// GET /users/{user_id}/answers - Answers written by the caller.
async fn list_user_answers(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<AnswerView>>> {
    let user_id = parse_user_id(&user_id)?;
    require_self(&auth, user_id)?;

    let answers = AnswerRepository::new((*state.db).clone())
        .list_by_writer(user_id)
        .await?;

    Ok(Json(answers.into_iter().map(Into::into).collect()))
}

/// POST /users/{user_id}/photo - Upload the caller's profile photo.
async fn upload_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<PictureResponse>> {
    let user_id = parse_user_id(&user_id)?;
    require_self(&auth, user_id)?;

    let mut photo = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("photo") {
            let original_name = field.file_name().unwrap_or_default().to_string();
            photo = Some((original_name, field.bytes().await?));
            break;
        }
    }
    let (original_name, bytes) =
        photo.ok_or_else(|| AppError::Validation(messages::INVALID_PAYLOAD.to_string()))?;

    let extension = allowed_extension(&original_name, PHOTO_EXTENSIONS)
        .ok_or_else(|| AppError::UnsupportedMediaType(messages::UNSUPPORTED_MEDIA_TYPE.to_string()))?;

    let users = UserRepository::new((*state.db).clone());
    let previous_picture = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()))?
        .picture;

    let file_name = format!("{user_id}.{extension}");
    state
        .storage
        .save(PHOTO_PREFIX, &file_name, bytes, content_type_for(&file_name))
        .await?;

    let picture = state.api_url(&format!("users/{user_id}/photo/{file_name}"));
    if !users.set_picture(user_id, &picture).await? {
        warn!(user_id = %user_id, "User removed while uploading photo");
        return Err(AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()).into());
    }

    // Only photos this server stored for the user are removed; the default
    // picture and external URLs are left alone.
    let own_photos = state.api_url(&format!("users/{user_id}/photo/"));
    if let Some(previous) = previous_picture.strip_prefix(own_photos.as_str()) {
        if !previous.is_empty() && previous != file_name {
            if let Err(e) = state.storage.delete(PHOTO_PREFIX, previous).await {
                warn!(user_id = %user_id, file_name = %previous, error = %e, "Failed to delete previous photo");
            }
        }
    }

    info!(user_id = %user_id, file_name = %file_name, "Stored profile photo");
    Ok(Json(PictureResponse { picture }))
}

/// GET /users/{user_id}/photo/{file_name} - Serve a stored photo.
async fn get_photo(
    State(state): State<AppState>,
    Path((_user_id, file_name)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let object = state.storage.fetch(PHOTO_PREFIX, &file_name).await?;

    Ok(([(header::CONTENT_TYPE, object.content_type)], object.bytes))
}

/// GET /users/debug - List every user.
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserView>>> {
    let users = UserRepository::new((*state.db).clone()).list_all().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
