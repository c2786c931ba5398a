use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session {0} already has a request in flight")]
    SessionBusy(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a failure, surfaced to the chat UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Connection,
    Retrieval,
    Generation,
    Request,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Connection => "connection",
            Self::Retrieval => "retrieval",
            Self::Generation => "generation",
            Self::Request => "request",
            Self::Internal => "internal",
        }
    }
}

impl RagChatError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::TomlParsing(_) => ErrorKind::Configuration,
            Self::Connection(_) => ErrorKind::Connection,
            Self::Database(_) | Self::Embedding(_) | Self::Retrieval(_) => ErrorKind::Retrieval,
            Self::Generation(_) | Self::Template(_) => ErrorKind::Generation,
            Self::InvalidOption(_) | Self::SessionNotFound(_) | Self::SessionBusy(_) => {
                ErrorKind::Request
            }
            Self::Http(_) | Self::Serialization(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

impl From<config::ConfigError> for RagChatError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RagChatError>;
