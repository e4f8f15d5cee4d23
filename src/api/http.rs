//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::rest::{articles, attachments, auth, comments, workspaces};
use super::state::AppState;
use super::websocket::ws_handler;
use crate::validation::FILE_SIZE_LIMIT;

/// Multipart framing allowance on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.cors_origin.as_deref());
    let uploads = ServeDir::new(&state.uploads_dir);

    let upload_route = post(attachments::upload_attachment)
        .layer(DefaultBodyLimit::max(FILE_SIZE_LIMIT as usize + MULTIPART_OVERHEAD));

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Accounts
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify", get(auth::verify))
        // Workspaces
        .route("/api/workspaces", get(workspaces::list_workspaces))
        .route("/api/workspaces/:id", get(workspaces::get_workspace))
        // Articles
        .route(
            "/api/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/api/articles/:id",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/api/articles/:id/attachments", upload_route)
        .route(
            "/api/articles/:id/attachments/:filename",
            delete(attachments::delete_attachment),
        )
        .route("/api/articles/:id/notify-update", post(articles::notify_update))
        .route("/api/articles/:id/versions", get(articles::list_versions))
        .route("/api/articles/:id/versions/:version", get(articles::get_version))
        // Comments
        .route(
            "/api/articles/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/comments/:id",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        // Uploaded files
        .nest_service("/uploads", uploads)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(e)) => {
            warn!(error = %e, "invalid CORS origin, allowing any");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
