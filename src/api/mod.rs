//! HTTP surface: the chat page plus a small JSON/SSE API

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use server::build_router;
pub use server::serve_api;
