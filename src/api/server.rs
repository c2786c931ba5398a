//! HTTP server implementation

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing::warn;

use crate::api::handlers;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::services::Services;
use crate::session::SessionManager;
use crate::Result;

/// Chat page plus the `/api` routes, with tracing and compression
///
/// Compression skips `text/event-stream`, so chat fragments are not buffered.
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::index))
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the chat server and run until Ctrl-C
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("Starting chat server...");

    let services = Services::connect(config).await?;
    let sessions = Arc::new(SessionManager::new(config.server.session_timeout));
    let cleanup = sessions.start_cleanup();

    let state = AppState {
        pipeline: services.pipeline(),
        sessions,
        defaults: config.chat.clone(),
    };
    let app = build_router(state, enable_cors);

    let addr = format!("{host}:{port}");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            services.shutdown().await;
            return Err(e.into());
        }
    };

    info!("Chat UI listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET    /                          - Chat page");
    info!("  GET    /api/health                - Health check");
    info!("  GET    /api/options               - Sidebar controls");
    info!("  POST   /api/sessions              - New session");
    info!("  GET    /api/sessions/:id/messages - Transcript");
    info!("  DELETE /api/sessions/:id          - Drop session");
    info!("  POST   /api/sessions/:id/chat     - Ask (SSE)");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    cleanup.abort();
    services.shutdown().await;
    served?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
