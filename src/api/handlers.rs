//! API request handlers

use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::Event;
use axum::response::sse::KeepAlive;
use axum::response::sse::Sse;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::error;
use tracing::info;

use crate::api::types::*;
use crate::errors::ErrorKind;
use crate::errors::RagChatError;
use crate::options::option_specs;
use crate::options::ChatOptions;
use crate::options::OptionSpec;
use crate::rag::ChatPipeline;
use crate::session::SessionManager;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
    pub sessions: Arc<SessionManager>,
    /// Initial sidebar values, also used when a request carries no options
    pub defaults: ChatOptions,
}

/// Error returned by a handler, rendered as an `ApiResponse` envelope
#[derive(Debug)]
pub struct ApiError(RagChatError);

impl From<RagChatError> for ApiError {
    fn from(err: RagChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RagChatError::InvalidOption(_) => StatusCode::BAD_REQUEST,
            RagChatError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            RagChatError::SessionBusy(_) => StatusCode::CONFLICT,
            other => match other.kind() {
                ErrorKind::Connection => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Retrieval | ErrorKind::Generation => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

type EventStream = UnboundedReceiverStream<Result<Event, axum::Error>>;

/// Chat page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.session_count(),
    }))
}

/// Sidebar controls with their current defaults
pub async fn list_options(State(state): State<AppState>) -> Json<ApiResponse<Vec<OptionSpec>>> {
    Json(ApiResponse::success(option_specs(&state.defaults)))
}

/// Start a new, empty transcript
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    let session = state.sessions.create_session();
    let session_id = session.lock().await.id.clone();
    info!("POST /api/sessions -> {}", session_id);
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(SessionResponse { session_id })),
    )
}

/// Drop a session and its transcript
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    info!("DELETE /api/sessions/{}", id);
    if state.sessions.delete_session(&id) {
        Ok(Json(ApiResponse::success(SessionResponse { session_id: id })))
    } else {
        Err(RagChatError::SessionNotFound(id).into())
    }
}

/// Transcript of a session; refused while a request is in flight
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessagesResponse>>> {
    let session = state
        .sessions
        .get_session(&id)
        .ok_or_else(|| RagChatError::SessionNotFound(id.clone()))?;
    let session = session
        .try_lock()
        .map_err(|_| RagChatError::SessionBusy(id.clone()))?;

    Ok(Json(ApiResponse::success(MessagesResponse {
        session_id: id,
        messages: session.turns().to_vec(),
    })))
}

/// Answer a prompt as a stream of server-sent events
///
/// Emits one `fragment` event per generated fragment, then either `done`
/// or `error`. The session stays locked until generation has finished.
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Sse<EventStream>> {
    info!("POST /api/sessions/{}/chat", id);

    if request.prompt.trim().is_empty() {
        return Err(RagChatError::InvalidOption("prompt is empty".to_string()).into());
    }
    let options = match &request.options {
        Some(overrides) => state.defaults.with_overrides(overrides)?,
        None => state.defaults.clone(),
    };
    options.validate()?;

    let session = state
        .sessions
        .get_session(&id)
        .ok_or_else(|| RagChatError::SessionNotFound(id.clone()))?;
    let mut session = session
        .try_lock_owned()
        .map_err(|_| RagChatError::SessionBusy(id.clone()))?;

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let pipeline = state.pipeline.clone();

    tokio::spawn(async move {
        let fragment_tx = tx.clone();
        let result = pipeline
            .respond(&mut session, &request.prompt, &options, move |fragment, message| {
                // A closed channel means the client went away; keep consuming
                let _ = fragment_tx.send(sse_event("fragment", &FragmentEvent { fragment, message }));
            })
            .await;

        let session_id = session.id.clone();
        // Unlock before queuing the final event
        drop(session);

        let event = match result {
            Ok(message) => sse_event(
                "done",
                &DoneEvent {
                    message: message.as_deref().unwrap_or_default(),
                },
            ),
            Err(e) => {
                error!("Chat request in session {} failed: {}", session_id, e);
                sse_event(
                    "error",
                    &ErrorEvent {
                        kind: e.kind(),
                        message: e.to_string(),
                    },
                )
            }
        };
        let _ = tx.send(event);
    });

    Ok(Sse::new(UnboundedReceiverStream::new(rx)).keep_alive(KeepAlive::default()))
}

fn sse_event<T: Serialize>(name: &str, payload: &T) -> Result<Event, axum::Error> {
    Event::default().event(name).json_data(payload)
}
