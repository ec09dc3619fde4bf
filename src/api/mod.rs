pub mod admin;
pub mod public;

use axum::{extract::DefaultBodyLimit, http::StatusCode, routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::media::lifecycle::GALLERY_LIMIT;
use crate::middleware::logging::logging_middleware;

use admin::admin_api_router;
use public::public_image_router;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

pub fn create_api_router(state: AppState) -> Router {
    // room for a full gallery plus thumbnail in one multipart request
    let body_limit = state.config.max_upload_bytes * (GALLERY_LIMIT + 1) + 1024 * 1024;

    Router::new()
        .route("/api/test", get(health))
        .nest("/api/admin", admin_api_router(state.clone()))
        .merge(public_image_router(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "message": "Server is running successfully" })),
    )
}
