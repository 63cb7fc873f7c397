use std::any::Any;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::errors::ApiError;
use super::handlers;
use super::state::SharedState;

/// Largest request body accepted, in bytes.
pub const CHAT_BODY_LIMIT: usize = 64 * 1024;

/// Build the Axum router with all routes and middleware.
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        // Health check (outside /api prefix)
        .route("/health", get(handlers::health))
        // Chat relay
        .route("/api/chat", post(handlers::chat))
        .route("/api/chat/status", get(handlers::chat_status))
        // Crawler files
        .route("/sitemap.xml", get(handlers::sitemap))
        .route("/robots.txt", get(handlers::robots))
        // Middleware
        .layer(DefaultBodyLimit::max(CHAT_BODY_LIMIT))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a handler panic into the generic JSON 500.
pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::InternalError(format!("handler panicked: {detail}")).into_response()
}
