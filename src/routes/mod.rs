// src/routes/mod.rs
pub mod chat;

use crate::config::Config;
use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::{chat_handler, health_handler};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// API routes only.
pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
}

/// API plus the client page and its assets.
pub fn create_router(config: &Config) -> Router<SharedState> {
    Router::new()
        .nest("/api", api_router())
        .route_service("/", ServeFile::new(&config.index_page))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
