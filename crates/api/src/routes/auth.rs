//! Token routes: exchange an identity provider ID token for a local token
//! pair, and refresh access tokens.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extractors::parse_id;
use crate::middleware::auth::{authorization_header, extract_bearer_token};
use crate::AppState;
use voicereader_db::UserRepository;
use voicereader_shared::auth::{DebugTokenResponse, RefreshResponse, TokenResponse};
use voicereader_shared::error::messages;
use voicereader_shared::types::UserId;
use voicereader_shared::{AppError, JwtError};

/// Creates the auth router.
pub fn routes(debug_routes: bool) -> Router<AppState> {
    let router = Router::new().route("/oauth2/token", get(issue_tokens).post(refresh));

    if debug_routes {
        router.route("/oauth2/token/debug", get(debug_token))
    } else {
        router
    }
}

fn encoding_error(err: JwtError) -> ApiError {
    ApiError(AppError::Internal(err.to_string()))
}

/// GET /oauth2/token - Exchange an ID token for access and refresh tokens.
async fn issue_tokens(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TokenResponse>> {
    let header = authorization_header(&headers)
        .ok_or_else(|| AppError::Validation(messages::MISSING_AUTHORIZATION.to_string()))?;
    let id_token = extract_bearer_token(header).unwrap_or(header);

    let identity = state.identity.verify(id_token).await?;

    let user_id = UserRepository::new((*state.db).clone())
        .find_id_by_fcm_uid(&identity.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_REGISTERED_USER.to_string()))?;

    let access_token = state
        .jwt_service
        .generate_access_token(user_id)
        .map_err(encoding_error)?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user_id)
        .map_err(encoding_error)?;

    info!(user_id = %user_id, "Issued token pair");
    Ok(Json(TokenResponse::new(
        access_token,
        refresh_token,
        state.jwt_service.access_token_expires_in(),
    )))
}

/// POST /oauth2/token - Exchange a refresh token for a new access token.
async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let token = authorization_header(&headers)
        .and_then(extract_bearer_token)
        .ok_or_else(|| AppError::Unauthorized(messages::MISSING_AUTHORIZATION.to_string()))?;

    let claims = state
        .jwt_service
        .validate_refresh_token(token)
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    let access_token = state
        .jwt_service
        .generate_access_token(claims.user_id())
        .map_err(encoding_error)?;

    info!(user_id = %claims.user_id(), "Refreshed access token");
    Ok(Json(RefreshResponse::new(
        access_token,
        state.jwt_service.access_token_expires_in(),
    )))
}

/// Query for the debug token route.
#[derive(Debug, Deserialize)]
struct DebugTokenQuery {
    user_id: String,
}

/// GET /oauth2/token/debug - Mint an access token for any user.
async fn debug_token(
    State(state): State<AppState>,
    Query(query): Query<DebugTokenQuery>,
) -> ApiResult<Json<DebugTokenResponse>> {
    let user_id: UserId = parse_id(&query.user_id, messages::INVALID_USER_ID)?;

    UserRepository::new((*state.db).clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::NOT_EXISTS_DATA.to_string()))?;

    let access_token = state
        .jwt_service
        .generate_access_token(user_id)
        .map_err(encoding_error)?;

    Ok(Json(DebugTokenResponse { access_token }))
}
