//! Unversioned service routes.

use axum::{
    Json, Router,
    extract::State,
    response::Redirect,
    routing::get,
};
use serde_json::{Value, json};

use crate::AppState;

/// Creates the unversioned routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/ping", get(ping))
        .route("/api/info/version", get(version))
        .route("/api/info/env", get(env))
}

async fn index() -> Redirect {
    Redirect::to("/api/v1/health")
}

async fn ping() -> &'static str {
    "pong"
}

async fn version(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "version": state.config.app.api_version }))
}

async fn env(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "env": state.config.app.env }))
}
