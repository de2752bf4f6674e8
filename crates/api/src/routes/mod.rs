//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod answers;
pub mod auth;
pub mod common;
pub mod health;
pub mod questions;
pub mod users;

/// Creates the versioned API router.
///
/// Token and registration routes read the Authorization header themselves;
/// everything else sits behind the access token middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let debug_routes = state.config.app.debug_routes;

    let protected_routes = Router::new()
        .merge(users::protected_routes())
        .merge(questions::protected_routes())
        .merge(answers::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes(debug_routes))
        .merge(users::public_routes(debug_routes))
        .merge(questions::public_routes())
        .merge(protected_routes)
}
