use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::state::AppState;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let body_limit = DefaultBodyLimit::max(state.config.uploads.max_body_bytes);
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Chat: multipart prompt + files
        .route("/api/chat", post(handlers::a001_chat::send_message))
        // A002 Image
        .route("/api/image", post(handlers::a002_image::generate))
        .layer(body_limit)
        .fallback_service(static_dir)
        .layer(cors)
        .with_state(state)
}
