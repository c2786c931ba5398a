//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create the `/api` router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Sidebar controls
        .route("/options", get(handlers::list_options))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:id", axum::routing::delete(handlers::delete_session))
        .route("/sessions/:id/messages", get(handlers::get_messages))
        .route("/sessions/:id/chat", post(handlers::chat))
        .with_state(state)
}
