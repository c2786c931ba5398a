//! Chat sessions and their transcripts

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use dashmap::DashMap;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One entry of the transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Transcript owned by one chat session
///
/// Turns are only ever appended. A completed request adds exactly one user
/// turn followed by one assistant turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: String,
    turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            turns: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    fn push(&mut self, role: Role, content: String) {
        let timestamp = Utc::now();
        self.turns.push(Turn {
            role,
            content,
            timestamp,
        });
        self.last_activity = timestamp;
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content.into());
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content.into());
    }

    /// All turns in insertion order
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn is_expired(&self, timeout: Duration) -> bool {
        let idle = Utc::now() - self.last_activity;
        idle.to_std().is_ok_and(|idle| idle > timeout)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Session registry keyed by session id
///
/// Each session sits behind its own mutex; holding the lock for the length of
/// a request is what keeps a session to one in-flight request.
pub struct SessionManager {
    sessions: Arc<DashMap<String, SharedSession>>,
    session_timeout: Duration,
}

impl SessionManager {
    #[must_use]
    pub fn new(session_timeout_secs: u64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            session_timeout: Duration::from_secs(session_timeout_secs),
        }
    }

    /// Spawn the idle-session cleanup loop; must be called inside a runtime
    pub fn start_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let sessions = self.sessions.clone();
        let timeout = self.session_timeout;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Self::cleanup_expired_sessions(&sessions, timeout);
            }
        })
    }

    pub fn create_session(&self) -> SharedSession {
        let session = ChatSession::new();
        let id = session.id.clone();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, shared.clone());
        shared
    }

    #[must_use]
    pub fn get_session(&self, session_id: &str) -> Option<SharedSession> {
        self.sessions.get(session_id).map(|s| s.value().clone())
    }

    pub fn delete_session(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn cleanup_expired_sessions(sessions: &DashMap<String, SharedSession>, timeout: Duration) {
        // Busy sessions are skipped; their lock is held by a running request
        let expired: Vec<String> = sessions
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .try_lock()
                    .is_ok_and(|session| session.is_expired(timeout))
            })
            .map(|entry| entry.key().clone())
            .collect();

        for session_id in expired {
            sessions.remove(&session_id);
            tracing::info!("Cleaned up expired session: {}", session_id);
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(3600) // 1 hour timeout
    }
}
