use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod entities;
mod error;
mod media;
mod middleware;

use crate::api::{create_api_router, AppState};
use crate::config::AppConfig;
use crate::entities::setup_schema;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("DATABASE_URL must be set");

    let db: DatabaseConnection = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to the database");
    setup_schema(&db)
        .await
        .expect("Failed to set up database schema");

    tokio::fs::create_dir_all(config.storage_root.join("productImages"))
        .await
        .expect("Failed to create image storage directory");

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        db: Arc::new(db),
        config: Arc::new(config),
    };
    let app = create_api_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!(addr = %bind_addr, "server listening");
    axum::serve(listener, app).await.expect("server error");
}
