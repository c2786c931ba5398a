//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::errors::ErrorKind;
use crate::session::Turn;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
}

/// A newly created session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
}

/// Transcript of a session
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub session_id: String,
    pub messages: Vec<Turn>,
}

/// Chat request; options are a partial object merged over the server defaults
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: Option<serde_json::Value>,
}

/// `fragment` event payload
#[derive(Debug, Serialize)]
pub struct FragmentEvent<'a> {
    pub fragment: &'a str,
    pub message: &'a str,
}

/// `done` event payload
#[derive(Debug, Serialize)]
pub struct DoneEvent<'a> {
    pub message: &'a str,
}

/// `error` event payload
#[derive(Debug, Serialize)]
pub struct ErrorEvent {
    pub kind: ErrorKind,
    pub message: String,
}
